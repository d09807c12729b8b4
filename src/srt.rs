//! WebVTT to SRT assembly
//!
//! Subtitle content arrives as many small WebVTT fragments whose lines the
//! orchestrator concatenates in manifest order. This module parses the cue
//! blocks back out of that aggregate and renders a single numbered SRT
//! document. Fragments overlap at their boundaries, so consecutive
//! identical cues collapse to one.

use crate::error::{Error, Result};

/// A single subtitle cue with timing in milliseconds
#[derive(Clone, Debug, PartialEq, Eq)]
struct Cue {
    start_ms: u64,
    end_ms: u64,
    text: String,
}

/// Assemble aggregated WebVTT fragment lines into one SRT document.
///
/// Timing lines (`start --> end`, optional hours, cue settings after the end
/// timestamp ignored) open a cue; the following lines up to a blank line are
/// its text. `WEBVTT` headers, `X-TIMESTAMP-MAP` lines and cue identifiers
/// are skipped. Cues are renumbered from 1 and timestamps rendered in the
/// `HH:MM:SS,mmm` form.
///
/// # Errors
///
/// Returns [`Error::Assembly`] when no parseable cue exists in `lines`.
pub fn assemble(lines: &[String]) -> Result<String> {
    let cues = parse_cues(lines);
    if cues.is_empty() {
        return Err(Error::Assembly(
            "no cues found in subtitle content".to_string(),
        ));
    }

    let mut out = String::new();
    for (index, cue) in cues.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n",
            index + 1,
            format_timestamp(cue.start_ms),
            format_timestamp(cue.end_ms),
            cue.text
        ));
    }
    Ok(out)
}

fn parse_cues(lines: &[String]) -> Vec<Cue> {
    let mut cues: Vec<Cue> = Vec::new();
    let mut iter = lines.iter().peekable();

    while let Some(line) = iter.next() {
        let Some((start_ms, end_ms)) = parse_timing_line(line) else {
            continue;
        };

        let mut text_lines = Vec::new();
        while let Some(next) = iter.peek() {
            let trimmed = next.trim();
            // A timing or header line right after the text means the blank
            // separator was lost at a fragment boundary; leave it for the
            // outer loop.
            if trimmed.is_empty() || is_header(trimmed) || parse_timing_line(trimmed).is_some() {
                break;
            }
            text_lines.push(trimmed.to_string());
            iter.next();
        }

        if text_lines.is_empty() {
            continue;
        }

        let cue = Cue {
            start_ms,
            end_ms,
            text: text_lines.join("\n"),
        };
        if cues.last() != Some(&cue) {
            cues.push(cue);
        }
    }

    cues
}

/// Fragment header lines that never belong to cue text.
fn is_header(line: &str) -> bool {
    line.starts_with("WEBVTT") || line.starts_with("X-TIMESTAMP-MAP")
}

/// Parse a `start --> end` timing line, ignoring cue settings after the end
/// timestamp. Returns `None` for anything that is not a timing line.
fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
    let (start, rest) = line.split_once("-->")?;
    let start_ms = parse_timestamp(start.trim())?;
    let end_ms = parse_timestamp(rest.split_whitespace().next()?)?;
    Some((start_ms, end_ms))
}

/// Parse a WebVTT timestamp (`HH:MM:SS.mmm` or `MM:SS.mmm`) to milliseconds.
/// Values whose total does not fit in `u64` milliseconds are rejected.
fn parse_timestamp(value: &str) -> Option<u64> {
    let (clock, millis) = value.split_once('.')?;
    if millis.is_empty() || millis.len() > 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // "04" means 40ms, not 4ms
    let millis: u64 = millis.parse::<u64>().ok()? * 10u64.pow(3 - millis.len() as u32);

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u64>().ok()?, m.parse::<u64>().ok()?, s.parse::<u64>().ok()?),
        [m, s] => (0, m.parse::<u64>().ok()?, s.parse::<u64>().ok()?),
        _ => return None,
    };
    if minutes > 59 || seconds > 59 {
        return None;
    }

    let clock_seconds = hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?;
    clock_seconds.checked_mul(1000)?.checked_add(millis)
}

/// Render milliseconds as an SRT timestamp (`HH:MM:SS,mmm`).
fn format_timestamp(total_ms: u64) -> String {
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &str) -> Vec<String> {
        raw.lines().map(str::to_string).collect()
    }

    #[test]
    fn assembles_numbered_srt_with_comma_timestamps() {
        let input = lines(
            "WEBVTT\n\
             X-TIMESTAMP-MAP=MPEGTS:181083,LOCAL:00:00:00.000\n\
             \n\
             00:00:01.040 --> 00:00:04.373\n\
             Hello and welcome to WWDC.\n\
             \n\
             00:00:04.373 --> 00:00:07.110\n\
             Let's get started.\n",
        );
        let srt = assemble(&input).unwrap();
        assert_eq!(
            srt,
            "1\n00:00:01,040 --> 00:00:04,373\nHello and welcome to WWDC.\n\
             \n\
             2\n00:00:04,373 --> 00:00:07,110\nLet's get started.\n"
        );
    }

    #[test]
    fn accepts_timestamps_without_hours() {
        let input = lines("00:12.500 --> 01:02.000\nShort form timing.\n");
        let srt = assemble(&input).unwrap();
        assert!(srt.contains("00:00:12,500 --> 00:01:02,000"));
    }

    #[test]
    fn ignores_cue_settings_after_the_end_timestamp() {
        let input = lines("00:00:01.000 --> 00:00:02.000 align:middle line:84%\nPositioned cue.\n");
        let srt = assemble(&input).unwrap();
        assert!(srt.contains("00:00:01,000 --> 00:00:02,000\nPositioned cue."));
    }

    #[test]
    fn collapses_duplicate_cues_at_fragment_boundaries() {
        // The last cue of one fragment is repeated as the first of the next.
        let input = lines(
            "WEBVTT\n\
             \n\
             00:00:01.000 --> 00:00:02.000\n\
             Repeated at the boundary.\n\
             WEBVTT\n\
             \n\
             00:00:01.000 --> 00:00:02.000\n\
             Repeated at the boundary.\n\
             \n\
             00:00:02.000 --> 00:00:03.000\n\
             Fresh content.\n",
        );
        let srt = assemble(&input).unwrap();
        assert_eq!(srt.matches("Repeated at the boundary.").count(), 1);
        assert!(srt.contains("2\n00:00:02,000 --> 00:00:03,000\nFresh content."));
    }

    #[test]
    fn keeps_multi_line_cue_text_together() {
        let input = lines(
            "00:00:01.000 --> 00:00:04.000\n\
             First line of the cue\n\
             second line of the cue.\n",
        );
        let srt = assemble(&input).unwrap();
        assert!(srt.contains("First line of the cue\nsecond line of the cue."));
    }

    #[test]
    fn cue_free_input_is_an_assembly_error() {
        let input = lines("WEBVTT\n\nNOTE nothing to see here\n");
        let err = assemble(&input).unwrap_err();
        assert!(matches!(err, Error::Assembly(_)));

        let err = assemble(&[]).unwrap_err();
        assert!(matches!(err, Error::Assembly(_)));
    }

    #[test]
    fn hour_rollover_formats_correctly() {
        let input = lines("01:00:59.999 --> 01:01:00.000\nAn hour in.\n");
        let srt = assemble(&input).unwrap();
        assert!(srt.contains("01:00:59,999 --> 01:01:00,000"));
    }

    #[test]
    fn malformed_timing_lines_are_skipped() {
        let input = lines(
            "garbage --> more garbage\n\
             00:00:99.000 --> 00:01:00.000\n\
             00:00:01.000 --> 00:00:02.000\n\
             Valid cue survives.\n",
        );
        let srt = assemble(&input).unwrap();
        assert_eq!(srt.matches("-->").count(), 1);
        assert!(srt.contains("Valid cue survives."));
    }

    #[test]
    fn overflowing_hour_field_is_rejected() {
        // u64::MAX hours cannot be represented as milliseconds
        let input = lines(
            "18446744073709551615:00:00.000 --> 18446744073709551615:00:01.000\n\
             Never a cue.\n",
        );
        assert!(matches!(assemble(&input), Err(Error::Assembly(_))));
    }
}
