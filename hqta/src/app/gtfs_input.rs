use serde::{Deserialize, Serialize};

/// a GTFS archive along with the agency name its records are attributed to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GtfsInput {
    pub path: String,
    pub agency: String,
}

impl std::fmt::Display for GtfsInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.path, self.agency)
    }
}

/// parses a command line GTFS input of the form `path=agency`. the split happens on
/// the last '=' so that paths may contain one.
pub fn parse_gtfs_input(s: &str) -> Result<GtfsInput, String> {
    let (path, agency) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected GTFS input as 'path=agency', found '{s}'"))?;
    let (path, agency) = (path.trim(), agency.trim());
    if path.is_empty() || agency.is_empty() {
        return Err(format!(
            "GTFS input '{s}' must have a non-empty path and agency"
        ));
    }
    if agency.contains(':') {
        return Err(format!(
            "agency name '{agency}' may not contain ':' as it is used to prefix identifiers"
        ));
    }
    Ok(GtfsInput {
        path: path.to_string(),
        agency: agency.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::parse_gtfs_input;

    #[test]
    fn test_parse() {
        let input = parse_gtfs_input("data/metro.zip=metro").unwrap();
        assert_eq!(input.path, "data/metro.zip");
        assert_eq!(input.agency, "metro");
        let with_query = parse_gtfs_input("https://host/gtfs?key=abc=bus").unwrap();
        assert_eq!(with_query.path, "https://host/gtfs?key=abc");
        assert_eq!(with_query.agency, "bus");
        assert!(parse_gtfs_input("data/metro.zip").is_err());
        assert!(parse_gtfs_input("data/metro.zip=").is_err());
        assert!(parse_gtfs_input("a.zip=x:y").is_err());
    }
}
