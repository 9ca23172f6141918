// Health-data log audit: scans every source file for tracing calls that would
// write symptom names, notes or other free text to the logs. Logs carry ids,
// counts, enum values and catalog keys only.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    /// Free-text field patterns that MUST NOT appear in tracing macro arguments.
    const FREE_TEXT_PATTERNS: &[&str] = &[
        // Symptom free text
        "symptom.name",
        "s.name",
        "symptom_name",
        ".notes",
        "notes =",
        // Red-flag display text
        "flag.symptom",
        "f.symptom",
        ".description",
        "display_name",
        "event.red_flag",
        "red_flag =",
        // Privacy event payloads
        ".details",
        "details =",
    ];

    /// Files that mention the patterns outside tracing calls on purpose.
    const ALLOWLIST: &[&str] = &["health_log_audit.rs"];

    #[test]
    fn no_free_text_in_tracing_calls() {
        let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        assert!(src_dir.exists(), "Source directory not found: {}", src_dir.display());

        let mut violations = Vec::new();
        scan_directory(&src_dir, &mut violations);

        if !violations.is_empty() {
            let report = violations
                .iter()
                .map(|(file, line_num, call, pattern)| {
                    format!("  {file}:{line_num}: found '{pattern}' in: {call}")
                })
                .collect::<Vec<_>>()
                .join("\n");
            panic!(
                "LOG AUDIT FAILED: {} violation(s) found in tracing calls:\n{}\n\n\
                 Fix: log ids, counts or pattern keys instead of free text.",
                violations.len(),
                report
            );
        }
    }

    #[test]
    fn scanner_detects_known_violation() {
        let line = r#"tracing::warn!(name = %symptom.name, "critical symptom");"#;
        assert!(find_violation(line).is_some(), "should flag: {line}");
    }

    #[test]
    fn scanner_passes_clean_tracing() {
        let line = r#"tracing::warn!(pattern_key = %flag.pattern_key, "red flag fired");"#;
        assert!(find_violation(line).is_none(), "should not flag: {line}");
    }

    fn find_violation(call: &str) -> Option<&'static str> {
        FREE_TEXT_PATTERNS.iter().copied().find(|p| call.contains(p))
    }

    fn scan_directory(dir: &Path, violations: &mut Vec<(String, usize, String, String)>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                scan_directory(&path, violations);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                scan_file(&path, violations);
            }
        }
    }

    fn scan_file(path: &Path, violations: &mut Vec<(String, usize, String, String)>) {
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        if ALLOWLIST.iter().any(|a| filename.contains(a)) {
            return;
        }

        let Ok(content) = fs::read_to_string(path) else {
            return;
        };

        let relative_path = path
            .strip_prefix(Path::new(env!("CARGO_MANIFEST_DIR")).join("src"))
            .unwrap_or(path)
            .display()
            .to_string();

        let lines: Vec<&str> = content.lines().collect();
        let mut i = 0;
        while i < lines.len() {
            let trimmed = lines[i].trim();
            if !trimmed.starts_with("tracing::") {
                i += 1;
                continue;
            }

            // Macro calls may span several lines; follow the parentheses.
            let mut call = String::from(trimmed);
            let start_line = i + 1;
            let mut depth = paren_delta(trimmed);
            let mut j = i + 1;
            while depth > 0 && j < lines.len() {
                let next = lines[j].trim();
                call.push(' ');
                call.push_str(next);
                depth += paren_delta(next);
                j += 1;
            }

            if let Some(pattern) = find_violation(&call) {
                violations.push((relative_path.clone(), start_line, call, pattern.to_string()));
            }
            i = j;
        }
    }

    fn paren_delta(s: &str) -> i32 {
        s.chars().fold(0, |acc, ch| match ch {
            '(' => acc + 1,
            ')' => acc - 1,
            _ => acc,
        })
    }
}
