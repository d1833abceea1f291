use std::collections::BTreeSet;

use hqta_core::error::QualificationError;
use regex::Regex;

/// separators between the streets of an intersection stop name, such as
/// "State & Madison", "Main St at 1st Ave", "Broadway @ 7th" or "Market/Castro"
const SEPARATOR_REGEX: &str = r"\s*(?:&|@|/|\bat\b)\s*";
/// descriptive words ending a street name along with anything following them,
/// such as "Union Station Platform 2"
const SUFFIX_REGEX: &str = r"\b(?:station|terminal|platform|stop|entrance)\b.*$";
const WHITESPACE_REGEX: &str = r"\s+";

/// extracts coarse street names from stop display names. matching is lexical and
/// case-insensitive: abbreviations ("St" vs "Street") and synonyms are not normalized.
pub struct StreetNameParser {
    separator: Regex,
    suffix: Regex,
    whitespace: Regex,
}

impl StreetNameParser {
    pub fn new() -> Result<StreetNameParser, QualificationError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                QualificationError::Internal(format!(
                    "failure compiling street name pattern '{pattern}': {e}"
                ))
            })
        };
        Ok(StreetNameParser {
            separator: compile(SEPARATOR_REGEX)?,
            suffix: compile(SUFFIX_REGEX)?,
            whitespace: compile(WHITESPACE_REGEX)?,
        })
    }

    /// the lowercase street tokens of a stop name
    pub fn parse_street_names(&self, stop_name: &str) -> BTreeSet<String> {
        let lowercase = stop_name.to_lowercase();
        self.separator
            .split(&lowercase)
            .map(|part| {
                let stripped = self.suffix.replace(part, "");
                self.whitespace.replace_all(stripped.trim(), " ").into_owned()
            })
            .filter(|street| !street.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::StreetNameParser;

    fn parse(name: &str) -> Vec<String> {
        StreetNameParser::new()
            .unwrap()
            .parse_street_names(name)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_separators() {
        assert_eq!(parse("State & Madison"), vec!["madison", "state"]);
        assert_eq!(parse("Main St at 1st Ave"), vec!["1st ave", "main st"]);
        assert_eq!(parse("Broadway @ 7th"), vec!["7th", "broadway"]);
        assert_eq!(parse("Market/Castro"), vec!["castro", "market"]);
        assert_eq!(parse("MAIN ST AT 1ST AVE"), vec!["1st ave", "main st"]);
    }

    #[test]
    fn test_suffixes_stripped() {
        assert_eq!(parse("Union Station Platform 2"), vec!["union"]);
        assert_eq!(parse("Harbor Fwy Station"), vec!["harbor fwy"]);
        assert_eq!(parse("Transit Terminal"), vec!["transit"]);
        // words merely containing "at" are not separators
        assert_eq!(parse("Atlantic  Blvd & Beverly"), vec!["atlantic blvd", "beverly"]);
        assert!(parse("Station").is_empty());
    }
}
