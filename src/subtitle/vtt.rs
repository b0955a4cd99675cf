// WebVTT subtitle parsing
use super::Cue;
use crate::error::Result;
use regex::Regex;

/// Parse WebVTT contents into a cue list.
///
/// Hours are optional in VTT timestamps. NOTE/STYLE blocks and cue settings
/// after the timing line are ignored.
pub fn parse(contents: &str) -> Result<Vec<Cue>> {
    let timing = Regex::new(
        r"(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})\s*-->\s*(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})",
    )
    .expect("Invalid regex");

    // CRLF files would otherwise never match the blank-line separator
    let contents = contents.replace('\r', "");

    let mut cues = Vec::new();

    for block in contents.split("\n\n").map(str::trim) {
        if block.is_empty()
            || block.starts_with("WEBVTT")
            || block.starts_with("NOTE")
            || block.starts_with("STYLE")
        {
            continue;
        }

        let mut lines = block.lines();
        let mut timing_caps = None;

        for line in lines.by_ref() {
            if let Some(caps) = timing.captures(line) {
                timing_caps = Some(caps);
                break;
            }
        }

        let Some(caps) = timing_caps else {
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
    let hours = caps
        .get(first_group)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(0))
        .unwrap_or(0);
    let field = |i: usize| caps[first_group + i].parse::<u64>().unwrap_or(0);
    hours * 3_600_000 + field(1) * 60_000 + field(2) * 1_000 + field(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
WEBVTT

00:01.000 --> 00:02.500
First cue

00:00:03.000 --> 00:00:05.000 align:start
Second cue
with a break
";

    #[test]
    fn test_parse_valid_vtt() {
        let cues = parse(SAMPLE).unwrap();
        assert_eq!(cues.len(), 2);

        assert_eq!(cues[0].start_ms, 1000);
        assert_eq!(cues[0].end_ms, 2500);
        assert_eq!(cues[0].text, "First cue");

        assert_eq!(cues[1].start_ms, 3000);
        assert_eq!(cues[1].text, "Second cue with a break");
    }

    #[test]
    fn test_parse_skips_note_blocks() {
        let input = "WEBVTT\n\nNOTE this is a comment\n\n00:01.000 --> 00:02.000\ncue\n";
        let cues = parse(input).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "cue");
    }

    #[test]
    fn test_parse_optional_hours() {
        let input = "WEBVTT\n\n01:00:01.000 --> 01:00:02.000\nlate\n";
        let cues = parse(input).unwrap();
        assert_eq!(cues[0].start_ms, 3_601_000);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let input =
            "WEBVTT\r\n\r\n00:01.000 --> 00:02.000\r\nFirst cue\r\n\r\n00:03.000 --> 00:04.000\r\nSecond cue\r\n";
        let cues = parse(input).unwrap();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "First cue");
        assert_eq!(cues[1].start_ms, 3000);
    }
}
