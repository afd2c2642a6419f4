use crate::domain::entities::operation_results::GitStatusSummary;

/// Parse `git status --porcelain=v2 --branch` output.
///
/// Each changed path lands in exactly one bucket. Index additions count as added, a
/// deletion on either side as deleted, everything else (modify, rename, copy, type change)
/// as modified.
pub fn parse_porcelain_v2(output: &str) -> GitStatusSummary {
    let mut summary = GitStatusSummary::default();

    for line in output.lines() {
        let mut parts = line.splitn(2, ' ');
        let tag = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("");

        match tag {
            "#" => parse_header(rest, &mut summary),
            "1" | "2" => match rest.as_bytes() {
                [b'A', _, ..] => summary.added += 1,
                [b'D', _, ..] | [_, b'D', ..] => summary.deleted += 1,
                [_, _, ..] => summary.modified += 1,
                _ => {}
            },
            "u" => summary.conflicted += 1,
            "?" => summary.untracked += 1,
            _ => {}
        }
    }

    summary
}

fn parse_header(header: &str, summary: &mut GitStatusSummary) {
    let mut parts = header.splitn(2, ' ');
    let key = parts.next().unwrap_or("");
    let value = parts.next().unwrap_or("").trim();

    match key {
        "branch.head" if value != "(detached)" && !value.is_empty() => {
            summary.branch = Some(value.to_string());
        }
        "branch.upstream" if !value.is_empty() => {
            summary.upstream = Some(value.to_string());
        }
        "branch.ab" => {
            for count in value.split_whitespace() {
                if let Some(ahead) = count.strip_prefix('+') {
                    summary.ahead = ahead.parse().unwrap_or(0);
                } else if let Some(behind) = count.strip_prefix('-') {
                    summary.behind = behind.parse().unwrap_or(0);
                }
            }
        }
        _ => {}
    }
}
