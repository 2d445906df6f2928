//! check::correlate
//!
//! Log correlation: fetching pod logs and folding them into a diagnosis as
//! an indented, word-wrapped excerpt.
//!
//! # Design
//!
//! Correlation is best-effort enrichment. A failed log fetch never fails the
//! check that requested it; a synthesized `couldn't get pod logs: <error>`
//! line takes the log's place so the degradation stays visible.
//!
//! Excerpts are wrapped to [`WRAP_WIDTH`] columns before indenting so long
//! log lines don't blow out the terminal report. The first excerpt line is
//! introduced with `"  > "`, continuation lines with `"    > "`.

use tracing::debug;

use crate::cluster::Cluster;

/// Column width log excerpts are wrapped to.
pub const WRAP_WIDTH: usize = 100;

/// Fetch a pod's logs and format them as an indented excerpt.
///
/// Returns a string that starts with a newline and can be appended directly
/// to a status message. A fetch failure degrades to an inline error note.
pub async fn pod_log_excerpt(cluster: &dyn Cluster, namespace: &str, pod: &str) -> String {
    let log = match cluster.pod_logs(namespace, pod).await {
        Ok(log) => log,
        Err(err) => {
            debug!(namespace, pod, %err, "log fetch failed, substituting note");
            format!("couldn't get pod logs: {}", err)
        }
    };

    indent_excerpt(&log)
}

/// Fetch and concatenate the logs of all pods matching a label selector.
///
/// Identical log bodies are deduplicated. Returns an empty string when the
/// selector matches no pods, so callers fall through to their generic
/// message with no extra detail.
pub async fn labeled_pods_excerpt(
    cluster: &dyn Cluster,
    namespace: &str,
    selector: &str,
) -> String {
    let pods = match cluster.pods_by_label(namespace, selector).await {
        Ok(pods) => pods,
        Err(err) => {
            debug!(namespace, selector, %err, "pod listing failed");
            return indent_excerpt(&format!("couldn't get pod logs: {}", err));
        }
    };

    let mut bodies: Vec<String> = Vec::new();
    for pod in &pods {
        let body = match cluster.pod_logs(namespace, pod).await {
            Ok(log) => log.trim().to_string(),
            Err(err) => format!("couldn't get pod logs: {}", err),
        };
        if !body.is_empty() && !bodies.contains(&body) {
            bodies.push(body);
        }
    }

    if bodies.is_empty() {
        return String::new();
    }

    indent_excerpt(&bodies.join("\n"))
}

/// Format a log body as an indented excerpt.
///
/// The body is trimmed, wrapped to [`WRAP_WIDTH`] columns, and every line
/// break (including `\r\n`, vertical tab, form feed, and the Unicode line
/// and paragraph separators) is normalized into the continuation indent.
pub fn indent_excerpt(body: &str) -> String {
    let wrapped = wrap(body.trim(), WRAP_WIDTH);
    format!("\n  > {}", normalize_breaks(&wrapped))
}

/// Replace every line break variant with the continuation indent.
fn normalize_breaks(text: &str) -> String {
    const REPLACEMENT: &str = "\n    > ";

    let mut out = text.replace("\r\n", REPLACEMENT);
    for brk in ['\r', '\n', '\u{b}', '\u{c}', '\u{85}', '\u{2028}', '\u{2029}'] {
        out = out.replace(brk, REPLACEMENT);
    }
    out
}

/// Greedy word wrap at the given column width.
///
/// Existing line breaks are preserved; words longer than the width are kept
/// whole on their own line.
fn wrap(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let mut column = 0;
        for (j, word) in line.split_whitespace().enumerate() {
            let len = word.chars().count();
            if j == 0 {
                out.push_str(word);
                column = len;
            } else if column + 1 + len > width {
                out.push('\n');
                out.push_str(word);
                column = len;
            } else {
                out.push(' ');
                out.push_str(word);
                column += 1 + len;
            }
        }
    }

    out
}
