//! Age brackets for age-group ranking

use serde::Serialize;

/// Closed integer age range; `max = None` means open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBracket {
    pub min: i32,
    pub max: Option<i32>,
}

impl AgeBracket {
    pub fn new(min: i32, max: Option<i32>) -> Self {
        Self { min, max }
    }

    /// Check if an age falls inside the bracket
    pub fn contains(&self, age: i32) -> bool {
        age >= self.min && self.max.map_or(true, |max| age <= max)
    }

    /// Human-readable label, e.g. `18-30` or `61+`
    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }

    fn overlaps(&self, other: &AgeBracket) -> bool {
        let self_max = self.max.unwrap_or(i32::MAX);
        let other_max = other.max.unwrap_or(i32::MAX);
        self.min <= other_max && other.min <= self_max
    }
}

/// Index of the bracket containing `age`, if any
pub fn bracket_index(brackets: &[AgeBracket], age: i32) -> Option<usize> {
    brackets.iter().position(|b| b.contains(age))
}

/// Parse a comma-separated bracket list such as `18-30,31-45,46-60,61-`
///
/// Brackets are returned sorted by their lower bound and must not overlap.
pub fn parse_age_brackets(raw: &str) -> Result<Vec<AgeBracket>, String> {
    let mut brackets = Vec::new();

    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        brackets.push(parse_bracket(part)?);
    }

    if brackets.is_empty() {
        return Err("at least one age bracket is required".to_string());
    }

    validate_age_brackets(&mut brackets)?;
    Ok(brackets)
}

/// Sort brackets and reject overlapping ranges
pub fn validate_age_brackets(brackets: &mut [AgeBracket]) -> Result<(), String> {
    brackets.sort_by_key(|b| b.min);

    for pair in brackets.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(format!(
                "age brackets {} and {} overlap",
                pair[0].label(),
                pair[1].label()
            ));
        }
    }

    Ok(())
}

fn parse_bracket(part: &str) -> Result<AgeBracket, String> {
    let (min, max) = part
        .split_once('-')
        .ok_or_else(|| format!("age bracket '{}' must look like MIN-MAX or MIN-", part))?;

    let min: i32 = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid lower bound in age bracket '{}'", part))?;

    let max = match max.trim() {
        "" => None,
        value => Some(
            value
                .parse::<i32>()
                .map_err(|_| format!("invalid upper bound in age bracket '{}'", part))?,
        ),
    };

    if min < 0 {
        return Err(format!("age bracket '{}' starts below zero", part));
    }
    if let Some(max) = max {
        if max < min {
            return Err(format!("age bracket '{}' is empty", part));
        }
    }

    Ok(AgeBracket { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_brackets() {
        let brackets = parse_age_brackets("18-30,31-45,46-60,61-").unwrap();
        assert_eq!(
            brackets,
            vec![
                AgeBracket::new(18, Some(30)),
                AgeBracket::new(31, Some(45)),
                AgeBracket::new(46, Some(60)),
                AgeBracket::new(61, None),
            ]
        );
    }

    #[test]
    fn test_parse_sorts_brackets() {
        let brackets = parse_age_brackets("40-49, 20-29").unwrap();
        assert_eq!(brackets[0].min, 20);
        assert_eq!(brackets[1].min, 40);
    }

    #[test]
    fn test_parse_rejects_overlap() {
        assert!(parse_age_brackets("18-30,30-45").is_err());
        assert!(parse_age_brackets("18-,50-60").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_age_brackets("").is_err());
        assert!(parse_age_brackets("18").is_err());
        assert!(parse_age_brackets("a-30").is_err());
        assert!(parse_age_brackets("30-18").is_err());
        assert!(parse_age_brackets("-5-10").is_err());
    }

    #[test]
    fn test_contains_and_index() {
        let brackets = parse_age_brackets("18-30,31-45,46-60,61-").unwrap();
        assert_eq!(bracket_index(&brackets, 17), None);
        assert_eq!(bracket_index(&brackets, 18), Some(0));
        assert_eq!(bracket_index(&brackets, 30), Some(0));
        assert_eq!(bracket_index(&brackets, 31), Some(1));
        assert_eq!(bracket_index(&brackets, 99), Some(3));
    }

    #[test]
    fn test_gap_between_brackets_is_unranked() {
        let brackets = parse_age_brackets("20-29,40-49").unwrap();
        assert_eq!(bracket_index(&brackets, 35), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AgeBracket::new(18, Some(30)).label(), "18-30");
        assert_eq!(AgeBracket::new(61, None).label(), "61+");
    }
}
