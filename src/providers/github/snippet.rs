/// Default number of log lines quoted per failed job.
pub const DEFAULT_SNIPPET_LINES: usize = 20;

const ERROR_KEYWORDS: &[&str] = &["error", "failed", "failure", "exception", "fatal"];

/// Extracts the part of a job log most likely to explain a failure.
///
/// Lines mentioning one of the error keywords win; the last `max_lines` of
/// them are returned in their original order. When nothing matches, the last
/// `max_lines` lines of the log are returned verbatim.
pub fn extract_snippet(logs: &str, max_lines: usize) -> String {
    if logs.is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = logs.split('\n').collect();

    let error_lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| {
            let lower = line.to_lowercase();
            ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        })
        .collect();

    if error_lines.is_empty() {
        tail(&lines, max_lines)
    } else {
        tail(&error_lines, max_lines)
    }
}

fn tail(lines: &[&str], max_lines: usize) -> String {
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(test)]
    mod extract_snippet {
        use super::*;

        #[test]
        fn returns_single_error_line() {
            let logs = "Line1\nLine2\nERROR: x\nLine4\nLine5";
            assert_eq!(extract_snippet(logs, 3), "ERROR: x");
        }

        #[test]
        fn returns_error_lines_in_order() {
            let logs = "Line1\nError: a\nLine3\nFailed: b\nLine5";
            assert_eq!(extract_snippet(logs, 2), "Error: a\nFailed: b");
        }

        #[test]
        fn falls_back_to_tail_without_keywords() {
            assert_eq!(extract_snippet("L1\nL2\nL3\nL4\nL5", 2), "L4\nL5");
        }

        #[test]
        fn returns_empty_for_empty_log() {
            assert_eq!(extract_snippet("", 5), "");
        }

        #[test]
        fn keeps_most_recent_error_lines() {
            let logs = "error 1\nerror 2\nok\nfatal 3\nexception 4";
            assert_eq!(extract_snippet(logs, 2), "fatal 3\nexception 4");
        }

        #[test]
        fn returns_whole_log_when_shorter_than_limit() {
            assert_eq!(extract_snippet("a\nb", 10), "a\nb");
        }

        #[test]
        fn preserves_original_casing() {
            let logs = "step 1\n##[error]Process completed with exit code 1.";
            assert_eq!(
                extract_snippet(logs, 5),
                "##[error]Process completed with exit code 1."
            );
        }
    }
}
