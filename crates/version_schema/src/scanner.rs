use std::sync::Arc;

use crate::component::{ComponentKind, Separator, VersionComponent, VersionComponentInstance};
use crate::error::{Result, VersionSchemaError};
use crate::schema::VersionSchema;
use crate::suffix::SuffixDefinition;

#[derive(PartialEq, Debug, Clone, Copy)]
enum ScanStage {
    NumericRun,
    Suffix,
    SuffixExtension,
    Done,
}

/// Single pass tokenizer over one raw version string.
///
/// Yields at most three instances: the numeric run, a suffix, and a suffix
/// extension. Once exhausted, or after the first error, it only ever yields
/// `Ok(None)`.
///
/// A tag is the whole run of letters when that run is a known spelling.
/// Otherwise, while an extension may still follow, it is the longest known
/// spelling the run starts with whose tag allows extension, and the rest of
/// the run is scanned as the extension (`betaSNAPSHOT`).
///
/// ```
/// let schema = version_schema::VersionSchema::builtin().unwrap();
/// let parts: Vec<String> = schema.create_scanner("2.0-beta-SNAPSHOT")
///     .map(|c| c.unwrap().to_string())
///     .collect();
/// assert_eq!(parts, ["2.0", "-beta", "-SNAPSHOT"]);
/// ```
pub struct VersionComponentScanner<'a> {
    schema: &'a VersionSchema,
    raw: &'a str,
    idx: usize,
    stage: ScanStage,
    position: usize,
    allows_more: bool,
}

impl<'a> VersionComponentScanner<'a> {
    pub(crate) fn new(schema: &'a VersionSchema, raw: &'a str) -> Self {
        Self {
            schema,
            raw,
            idx: 0,
            stage: ScanStage::NumericRun,
            position: 0,
            allows_more: true,
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn is_exhausted(&self) -> bool {
        self.stage == ScanStage::Done && self.at_end()
    }

    /// Next component of the chain, `Ok(None)` at the end.
    pub fn next_component_instance(&mut self) -> Result<Option<VersionComponentInstance>> {
        let result = self.scan();
        if result.is_err() {
            self.stage = ScanStage::Done;
            self.idx = self.raw.len();
        }
        result
    }

    fn at_end(&self) -> bool {
        self.idx >= self.raw.len()
    }

    fn remaining(&self) -> &'a str {
        &self.raw[self.idx..]
    }

    fn scan(&mut self) -> Result<Option<VersionComponentInstance>> {

        match self.stage {
            ScanStage::NumericRun => {
                let instance = self.scan_numeric_run()?;
                self.stage = ScanStage::Suffix;
                self.finish(instance)
            }
            ScanStage::Suffix => {
                let instance = self.scan_suffix()?;
                self.stage = ScanStage::SuffixExtension;
                self.finish(instance)
            }
            ScanStage::SuffixExtension => {
                if !self.allows_more {
                    return Err(self.malformed(self.idx, "end of version", self.remaining()));
                }
                let instance = self.scan_suffix()?;
                self.stage = ScanStage::Done;
                self.finish(instance)
            }
            ScanStage::Done => {
                if self.at_end() {
                    Ok(None)
                } else {
                    Err(self.malformed(self.idx, "end of version", self.remaining()))
                }
            }
        }
    }

    fn finish(&mut self, instance: VersionComponentInstance) -> Result<Option<VersionComponentInstance>> {
        tracing::trace!(raw = self.raw, position = self.position, text = instance.text(), "scanned component");
        if self.at_end() {
            self.stage = ScanStage::Done;
        }
        self.position += 1;
        Ok(Some(instance))
    }

    // digits ("." digits)*
    fn scan_numeric_run(&mut self) -> Result<VersionComponentInstance> {
        let start = self.idx;
        let rest = self.remaining();
        let len = numeric_run_len(rest);
        if len == 0 {
            return Err(self.malformed(start, "numeric run", rest));
        }

        let text = &rest[..len];
        let numbers = self.parse_numbers(start, text)?;
        self.idx += len;

        Ok(VersionComponentInstance::new(ComponentKind::Numeric, Separator::None, text, numbers, self.position))
    }

    // [sep] tag [[sep] digits ("." digits)*]
    fn scan_suffix(&mut self) -> Result<VersionComponentInstance> {

        let separator = self.remaining()
            .chars()
            .next()
            .and_then(Separator::from_char)
            .unwrap_or(Separator::None);

        let token_start = self.idx + separator.as_str().len();
        let token = &self.raw[token_start..];

        let run_end = token.find(|c: char| !c.is_alphabetic()).unwrap_or(token.len());
        if run_end == 0 {
            return Err(self.malformed(token_start, "suffix", token));
        }

        // "betaSNAPSHOT": the whole run first, then the longest known prefix
        // that leaves the rest to an extension
        let can_split = self.stage == ScanStage::Suffix;
        let (letters_len, definition) = match self.match_tag(&token[..run_end], can_split) {
            Some(found) => found,
            None => return Err(self.malformed(token_start, "known suffix", &token[..run_end])),
        };
        let letters = &token[..letters_len];

        // optional trailing number: "alpha1", "rc-1", "beta.2"
        let after = &token[letters_len..];
        let number_sep_len = match after.as_bytes() {
            [b'-' | b'.', d, ..] if d.is_ascii_digit() => 1,
            _ => 0,
        };
        let run_len = numeric_run_len(&after[number_sep_len..]);
        let (text, numbers) = if run_len == 0 {
            (letters, Vec::new())
        } else {
            let run_start = letters_len + number_sep_len;
            let run = &token[run_start..run_start + run_len];
            let numbers = self.parse_numbers(token_start + run_start, run)?;
            (&token[..run_start + run_len], numbers)
        };

        self.idx = token_start + text.len();
        self.allows_more = definition.allows_extension();

        let kind = ComponentKind::Suffix(VersionComponent::new(definition));
        Ok(VersionComponentInstance::new(kind, separator, text, numbers, self.position))
    }

    fn match_tag(&self, letters: &str, can_split: bool) -> Option<(usize, Arc<SuffixDefinition>)> {
        if let Some(def) = self.schema.lookup(letters) {
            return Some((letters.len(), Arc::clone(def)));
        }
        if !can_split {
            return None;
        }
        letters.char_indices()
            .map(|(end, _)| end)
            .filter(|&end| end > 0)
            .rev()
            .find_map(|end| {
                self.schema.lookup(&letters[..end])
                    .filter(|def| def.allows_extension())
                    .map(|def| (end, Arc::clone(def)))
            })
    }

    fn parse_numbers(&self, offset: usize, run: &str) -> Result<Vec<u64>> {
        run.split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| self.malformed(offset, "numbers that fit in 64 bits", run))
    }

    fn malformed(&self, offset: usize, expected: &'static str, found: &str) -> VersionSchemaError {
        VersionSchemaError::MalformedVersion {
            raw: self.raw.to_string(),
            offset,
            expected,
            found: found.to_string(),
        }
    }
}

impl Iterator for VersionComponentScanner<'_> {
    type Item = Result<VersionComponentInstance>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_component_instance().transpose()
    }
}

impl std::iter::FusedIterator for VersionComponentScanner<'_> {}

/// Byte length of the leading `digits ("." digits)*` run of `s`, 0 if there is none.
///
/// A trailing dot that is not followed by a digit is not part of the run.
fn numeric_run_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut idx = 0;
    loop {
        let start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == start {
            break;
        }
        end = idx;
        if idx < bytes.len() && bytes[idx] == b'.' {
            idx += 1;
        } else {
            break;
        }
    }
    end
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::test::test_schema;

    fn malformed_at(r: Result<crate::Version>) -> Option<(usize, &'static str, String)> {
        match r {
            Err(VersionSchemaError::MalformedVersion { offset, expected, found, .. }) => Some((offset, expected, found)),
            _ => None,
        }
    }

    #[test]
    fn run_len() {
        assert_eq!(numeric_run_len(""), 0);
        assert_eq!(numeric_run_len("a1"), 0);
        assert_eq!(numeric_run_len("1"), 1);
        assert_eq!(numeric_run_len("1.0.3"), 5);
        assert_eq!(numeric_run_len("1.0."), 3);
        assert_eq!(numeric_run_len("1.0.Final"), 3);
        assert_eq!(numeric_run_len("10..2"), 2);
        assert_eq!(numeric_run_len("2.0-beta"), 3);
    }

    #[test]
    fn three_components() {
        let schema = test_schema();
        let mut scanner = schema.create_scanner("2.0-beta-SNAPSHOT");

        let numbers = scanner.next_component_instance().unwrap().unwrap();
        assert!(numbers.is_numeric());
        assert_eq!(numbers.text(), "2.0");
        assert_eq!(numbers.numbers(), [2, 0]);
        assert_eq!(numbers.separator(), Separator::None);
        assert_eq!(numbers.position(), 0);

        let suffix = scanner.next_component_instance().unwrap().unwrap();
        assert_eq!(suffix.text(), "beta");
        assert_eq!(suffix.separator(), Separator::Dash);
        assert_eq!(suffix.component().unwrap().name(), "Beta");
        assert_eq!(suffix.position(), 1);

        let extension = scanner.next_component_instance().unwrap().unwrap();
        assert_eq!(extension.text(), "SNAPSHOT");
        assert_eq!(extension.separator(), Separator::Dash);
        assert_eq!(extension.component().unwrap().name(), "SNAPSHOT");
        assert_eq!(extension.position(), 2);

        assert!(scanner.is_exhausted());
        assert!(scanner.next_component_instance().unwrap().is_none());
        assert!(scanner.next_component_instance().unwrap().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn numeric_only() {
        let schema = test_schema();
        let mut scanner = schema.create_scanner("1.0.3");
        let numbers = scanner.next_component_instance().unwrap().unwrap();
        assert_eq!(numbers.numbers(), [1, 0, 3]);
        assert!(scanner.next_component_instance().unwrap().is_none());
        assert!(scanner.next_component_instance().unwrap().is_none());
    }

    #[test]
    fn suffix_numbers() {
        let schema = test_schema();

        let cases: &[(&str, &str, Separator, &str, &[u64])] = &[
            ("1.0-alpha1", "1.0", Separator::Dash, "alpha1", &[1]),
            ("1.0-RC-1", "1.0", Separator::Dash, "RC-1", &[1]),
            ("1.0.beta.2", "1.0", Separator::Dot, "beta.2", &[2]),
            ("3b12", "3", Separator::None, "b12", &[12]),
            ("1.0Final", "1.0", Separator::None, "Final", &[]),
            ("1.0.GA", "1.0", Separator::Dot, "GA", &[]),
            ("4-a1.2", "4", Separator::Dash, "a1.2", &[1, 2]),
        ];

        for (raw, nums, sep, text, numbers) in cases {
            let parts = schema.create_scanner(raw).collect::<Result<Vec<_>>>().unwrap();
            assert_eq!(parts.len(), 2, "{raw}");
            assert_eq!(parts[0].text(), *nums, "{raw}");
            assert_eq!(parts[1].separator(), *sep, "{raw}");
            assert_eq!(parts[1].text(), *text, "{raw}");
            assert_eq!(parts[1].numbers(), *numbers, "{raw}");
        }
    }

    #[test]
    fn extension_keeps_own_number() {
        let schema = test_schema();
        let parts = schema.create_scanner("1.0-beta-1-SNAPSHOT").collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].text(), "beta-1");
        assert_eq!(parts[2].text(), "SNAPSHOT");

        // a dot not followed by a digit is the extension separator
        let parts = schema.create_scanner("1.0-beta.SNAPSHOT").collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(parts[1].text(), "beta");
        assert_eq!(parts[2].separator(), Separator::Dot);
    }

    #[test]
    fn malformed() {
        let schema = test_schema();

        assert_eq!(malformed_at(schema.version("")), Some((0, "numeric run", "".into())));
        assert_eq!(malformed_at(schema.version("beta-1.0")), Some((0, "numeric run", "beta-1.0".into())));
        assert_eq!(malformed_at(schema.version("v1.0")), Some((0, "numeric run", "v1.0".into())));
        assert_eq!(malformed_at(schema.version("1.0-gamma")), Some((4, "known suffix", "gamma".into())));
        assert_eq!(malformed_at(schema.version("1.0-")), Some((4, "suffix", "".into())));
        assert_eq!(malformed_at(schema.version("1..0")), Some((2, "suffix", "0".into())));
        assert_eq!(malformed_at(schema.version("1.0+b")), Some((3, "suffix", "+b".into())));
        assert_eq!(malformed_at(schema.version("1.0-final-SNAPSHOT")), Some((9, "end of version", "-SNAPSHOT".into())));
        assert_eq!(malformed_at(schema.version("1.0-beta-SNAPSHOT-x")), Some((17, "end of version", "-x".into())));
        assert_eq!(malformed_at(schema.version("1.0-beta1x")), Some((9, "known suffix", "x".into())));
        assert_eq!(
            malformed_at(schema.version("99999999999999999999")),
            Some((0, "numbers that fit in 64 bits", "99999999999999999999".into()))
        );
    }

    #[test]
    fn error_ends_the_sequence() {
        let schema = test_schema();
        let mut scanner = schema.create_scanner("1.0-gamma");
        assert!(scanner.next_component_instance().unwrap().is_some());
        assert!(scanner.next_component_instance().is_err());
        assert!(scanner.next_component_instance().unwrap().is_none());
        assert!(scanner.is_exhausted());

        let mut scanner = schema.create_scanner("x");
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }

    #[test]
    fn non_extensible_suffix() {
        let mut builder = crate::SchemaBuilder::new();
        builder.suffix_builder("Beta").add_variant("beta").set_allows_extension(false);
        builder.suffix_builder("SNAPSHOT");
        builder.final_suffix_builder();
        let schema = builder.build().unwrap();

        assert!(schema.version("1.0-SNAPSHOT-beta").is_ok());
        assert_eq!(malformed_at(schema.version("1.0-beta-SNAPSHOT")), Some((8, "end of version", "-SNAPSHOT".into())));

        // no split either when the tag takes no extension
        assert_eq!(malformed_at(schema.version("1.0-betaSNAPSHOT")), Some((4, "known suffix", "betaSNAPSHOT".into())));
    }

    #[test]
    fn extension_without_separator() {
        let schema = test_schema();

        let parts = schema.create_scanner("2.0-betaSNAPSHOT").collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].text(), "beta");
        assert_eq!(parts[1].separator(), Separator::Dash);
        assert_eq!(parts[2].text(), "SNAPSHOT");
        assert_eq!(parts[2].separator(), Separator::None);
        assert_eq!(parts[2].component().unwrap().name(), "SNAPSHOT");

        let parts = schema.create_scanner("2.0.rcSNAPSHOT").collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].component().unwrap().name(), "CR");
        assert_eq!(parts[2].text(), "SNAPSHOT");

        let joined = schema.version("2.0-betaSNAPSHOT").unwrap();
        assert_eq!(joined.to_string(), "2.0-betaSNAPSHOT");
        assert_eq!(joined.compare_to(&schema.version("2.0-beta-SNAPSHOT").unwrap()).unwrap(), std::cmp::Ordering::Equal);
        assert_eq!(
            schema.version("2.0-betaSNAPSHOT").unwrap().compare_to(&schema.version("2.0-beta1SNAPSHOT").unwrap()).unwrap(),
            std::cmp::Ordering::Less
        );

        // a run that is a known spelling as a whole is never split
        let parts = schema.create_scanner("1.0-alpha").collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(parts.len(), 2);

        // the final tag takes no extension, the extension itself is never split
        assert_eq!(malformed_at(schema.version("2.0-finalSNAPSHOT")), Some((4, "known suffix", "finalSNAPSHOT".into())));
        assert_eq!(malformed_at(schema.version("2.0-beta-SNAPSHOTbeta")), Some((9, "known suffix", "SNAPSHOTbeta".into())));
    }
}
