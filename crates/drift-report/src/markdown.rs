//! Markdown rendering.

use std::fmt::Write;

use drift_diff::{render_fenced, DiffStats};

use crate::report::Report;

/// Render `report` as a Markdown document.
///
/// Sections appear in the order Unchanged (when listed), Added, Removed,
/// Modified, Warnings (when any), Summary. Empty sections read `_None_`.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, report);
    out
}

fn write_document(out: &mut String, report: &Report) -> std::fmt::Result {
    writeln!(out, "# Drift Report")?;
    writeln!(out)?;
    writeln!(out, "- Old: `{}`", report.old_root.display())?;
    writeln!(out, "- New: `{}`", report.new_root.display())?;
    writeln!(
        out,
        "- Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    if let Some(unchanged) = &report.unchanged {
        write_path_section(out, "Unchanged", unchanged)?;
    }
    write_path_section(out, "Added", &report.added)?;
    write_path_section(out, "Removed", &report.removed)?;

    writeln!(out)?;
    writeln!(out, "## Modified ({})", report.modified.len())?;
    writeln!(out)?;
    if report.modified.is_empty() {
        writeln!(out, "_None_")?;
    }
    for entry in &report.modified {
        match &entry.diff {
            Some(diff) => {
                let stats = DiffStats::of(diff);
                writeln!(out, "- `{}` (+{} -{})", entry.path, stats.insertions, stats.deletions)?;
            }
            None => writeln!(out, "- `{}`", entry.path)?,
        }
        if let Some(diff) = &entry.diff {
            writeln!(out)?;
            out.push_str(&render_fenced(diff));
            writeln!(out)?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Warnings ({})", report.warnings.len())?;
        writeln!(out)?;
        for warning in &report.warnings {
            writeln!(out, "- {warning}")?;
        }
    }

    let summary = &report.summary;
    writeln!(out)?;
    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "| | Count |")?;
    writeln!(out, "|---|---:|")?;
    writeln!(out, "| Added | {} |", summary.added)?;
    writeln!(out, "| Removed | {} |", summary.removed)?;
    writeln!(out, "| Modified | {} |", summary.modified)?;
    writeln!(out, "| Unchanged | {} |", summary.unchanged)?;
    writeln!(out, "| Files (old) | {} |", summary.old_total)?;
    writeln!(out, "| Files (new) | {} |", summary.new_total)?;
    Ok(())
}

fn write_path_section(out: &mut String, title: &str, paths: &[String]) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "## {title} ({})", paths.len())?;
    writeln!(out)?;
    if paths.is_empty() {
        return writeln!(out, "_None_");
    }
    for path in paths {
        writeln!(out, "- `{path}`")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ReportBuilder;
    use drift_diff::DiffLine;
    use drift_types::{Warning, WarningKind};

    fn scenario() -> ReportBuilder {
        let mut builder = ReportBuilder::new("/trees/old", "/trees/new");
        builder.add_added("b.bin");
        builder.add_modified(
            "a.txt",
            Some(vec![DiffLine::delete("hello"), DiffLine::insert("hello world")]),
        );
        builder.set_totals(1, 2);
        builder
    }

    #[test]
    fn renders_sections_in_order() {
        let md = render_markdown(&scenario().build(false));
        let added = md.find("## Added (1)").unwrap();
        let removed = md.find("## Removed (0)").unwrap();
        let modified = md.find("## Modified (1)").unwrap();
        let summary = md.find("## Summary").unwrap();
        assert!(added < removed && removed < modified && modified < summary);
        assert!(!md.contains("## Unchanged"));
        assert!(!md.contains("## Warnings"));
        assert!(md.contains("- Old: `/trees/old`"));
    }

    #[test]
    fn modified_entries_embed_fenced_diff() {
        let md = render_markdown(&scenario().build(false));
        assert!(md.contains("- `a.txt` (+1 -1)\n\n```diff\n-hello\n+hello world\n```\n"));
    }

    #[test]
    fn empty_sections_say_none() {
        let md = render_markdown(&scenario().build(false));
        let removed = md.find("## Removed (0)").unwrap();
        assert!(md[removed..].starts_with("## Removed (0)\n\n_None_\n"));
    }

    #[test]
    fn unchanged_and_warnings_when_present() {
        let mut builder = scenario();
        builder.add_unchanged("same.txt");
        builder.add_warning(Warning::for_path(
            WarningKind::DisassemblyRefused,
            "lib/App.dll",
            "access is denied",
        ));
        let md = render_markdown(&builder.build(true));
        assert!(md.find("## Unchanged (1)").unwrap() < md.find("## Added").unwrap());
        assert!(md.contains("- `same.txt`"));
        assert!(md.contains("- `a.txt` (+1 -1)"));
        assert!(md.contains("## Warnings (1)"));
        assert!(md.contains("- [disassembly-refused] access is denied (lib/App.dll)"));
    }

    #[test]
    fn summary_table_counts() {
        let md = render_markdown(&scenario().build(false));
        assert!(md.contains("| Added | 1 |"));
        assert!(md.contains("| Modified | 1 |"));
        assert!(md.contains("| Files (old) | 1 |"));
        assert!(md.contains("| Files (new) | 2 |"));
    }
}
