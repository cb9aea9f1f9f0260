use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid bond label '{0}'. Expected a number such as '3' or 'No.3'.")]
    InvalidLabel(String),

    #[error("Invalid bond range '{0}'. Expected 'first-last' with first <= last (e.g., '1-6').")]
    InvalidRange(String),
}

fn parse_label(token: &str) -> Result<usize, ParseError> {
    let bare = token.trim().trim_start_matches("No.");
    bare.parse()
        .map_err(|_| ParseError::InvalidLabel(token.to_string()))
}

/// Expands bond label arguments into bare labels.
///
/// Each argument may hold comma-separated labels and inclusive ranges, so
/// `["1-3,7", "No.9"]` becomes `1 2 3 7 9`. Duplicates keep their first
/// position.
pub fn expand_bond_labels(args: &[String]) -> Result<Vec<String>, ParseError> {
    let mut labels: Vec<String> = Vec::new();
    let mut push = |n: usize| {
        let label = n.to_string();
        if !labels.contains(&label) {
            labels.push(label);
        }
    };
    for token in args.iter().flat_map(|a| a.split(',')).filter(|t| !t.trim().is_empty()) {
        match token.split_once('-') {
            Some((first, last)) => {
                let invalid = || ParseError::InvalidRange(token.to_string());
                let first = parse_label(first).map_err(|_| invalid())?;
                let last = parse_label(last).map_err(|_| invalid())?;
                if first > last {
                    return Err(invalid());
                }
                (first..=last).for_each(&mut push);
            }
            None => push(parse_label(token)?),
        }
    }
    Ok(labels)
}

/// Compound identifier for a feature row: the file stem, or the parent
/// directory name for generic stems such as `condensed_analysis`.
pub fn compound_id(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let generic = stem.is_empty() || stem == "condensed_analysis" || stem == "analysis";
    if generic {
        if let Some(dir) = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|d| d.to_str())
        {
            return dir.to_string();
        }
    }
    stem.to_string()
}
