// SRT subtitle parsing
use super::Cue;
use crate::error::Result;
use regex::Regex;

/// Parse SRT contents into a cue list.
///
/// Entries with invalid timing or empty text are skipped; surviving cues are
/// renumbered sequentially so downstream temp filenames stay unique.
pub fn parse(contents: &str) -> Result<Vec<Cue>> {
    let timing =
        Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
            .expect("Invalid regex");

    // CRLF files would otherwise never match the blank-line separator
    let contents = contents.replace('\r', "");

    let mut cues = Vec::new();

    for block in contents.split("\n\n").map(str::trim) {
        if block.is_empty() {
            continue;
        }

        let mut lines = block.lines();
        let mut timing_line = None;

        // The counter line is optional in practice; scan for the timing line.
        for line in lines.by_ref() {
            if let Some(caps) = timing.captures(line) {
                timing_line = Some(caps);
                break;
            }
        }

        let Some(caps) = timing_line else {
            continue;
        };

        let start_ms = timestamp_ms(&caps, 1);
        let end_ms = timestamp_ms(&caps, 5);
        let text = lines.collect::<Vec<_>>().join("\n");

        if let Some(cue) = Cue::new(cues.len() + 1, start_ms, end_ms, &text) {
            cues.push(cue);
        }
    }

    Ok(cues)
}

fn timestamp_ms(caps: &regex::Captures<'_>, first_group: usize) -> u64 {
    let field = |i: usize| caps[first_group + i].parse::<u64>().unwrap_or(0);
    field(0) * 3_600_000 + field(1) * 60_000 + field(2) * 1_000 + field(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1
00:00:01,000 --> 00:00:02,500
This is the first line
merged across a break

2
00:00:03,000 --> 00:00:05,000
This is the second line
";

    #[test]
    fn test_parse_valid_srt() {
        let cues = parse(SAMPLE).unwrap();
        assert_eq!(cues.len(), 2);

        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].start_ms, 1000);
        assert_eq!(cues[0].end_ms, 2500);
        assert_eq!(cues[0].duration_ms, 1500);
        assert_eq!(cues[0].text, "This is the first line merged across a break");

        assert_eq!(cues[1].index, 2);
        assert_eq!(cues[1].start_ms, 3000);
        assert_eq!(cues[1].end_ms, 5000);
        assert_eq!(cues[1].duration_ms, 2000);
    }

    #[test]
    fn test_parse_skips_invalid_entries() {
        let input = "\
1
00:00:01,000 --> 00:00:01,000
zero duration

2
00:00:02,000 --> 00:00:03,000


3
00:00:04,000 --> 00:00:05,000
kept
";
        let cues = parse(input).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "kept");
        // Renumbered after filtering
        assert_eq!(cues[0].index, 1);
    }

    #[test]
    fn test_parse_hour_timestamps() {
        let input = "1\n01:01:01,123 --> 01:01:02,456\nlate cue\n";
        let cues = parse(input).unwrap();
        assert_eq!(cues[0].start_ms, 3_661_123);
        assert_eq!(cues[0].end_ms, 3_662_456);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let input = "1\r\n00:00:01,000 --> 00:00:02,500\r\nFirst line\r\nsecond half\r\n\r\n2\r\n00:00:03,000 --> 00:00:05,000\r\nSecond line\r\n";
        let cues = parse(input).unwrap();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "First line second half");
        assert_eq!(cues[1].start_ms, 3000);
        assert_eq!(cues[1].text, "Second line");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }
}
