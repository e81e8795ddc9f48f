use regex::Regex;
use std::sync::OnceLock;

/// ATX heading marker with owned syntax knowledge.
pub struct Heading;

/// Match details for a heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSig {
    /// Heading rank, 1..=6.
    pub level: u8,
    /// Byte length of the marker (hashes plus the following space).
    pub marker_len: usize,
}

static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();

fn heading_regex() -> &'static Regex {
    HEADING_REGEX.get_or_init(|| Regex::new(r"^(#{1,6}) ").expect("Invalid heading regex"))
}

impl Heading {
    /// Maximum heading rank in the grammar.
    pub const MAX_LEVEL: u8 = 6;

    /// Matches a heading marker at the start of the line.
    ///
    /// The grammar requires a space after the hashes, so `#tag` lines stay
    /// plain text.
    pub fn sig(content: &str) -> Option<HeadingSig> {
        heading_regex().captures(content).map(|c| {
            let hashes = c.get(1).map_or(0, |m| m.len());
            HeadingSig {
                level: hashes as u8,
                marker_len: hashes + 1,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_one_through_six() {
        for level in 1..=6u8 {
            let line = format!("{} Title", "#".repeat(level as usize));
            let sig = Heading::sig(&line).unwrap();
            assert_eq!(sig.level, level);
            assert_eq!(sig.marker_len, level as usize + 1);
        }
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        assert_eq!(Heading::sig("####### Too deep"), None);
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        assert_eq!(Heading::sig("#tag"), None);
    }

    #[test]
    fn indented_hash_is_not_a_heading() {
        assert_eq!(Heading::sig("  # Indented"), None);
    }
}
