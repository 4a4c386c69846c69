//! Markdown rendering.
//!
//! A pure function from an ordered list of processed entries to one
//! document. No I/O here — the pipeline writes the result.
//!
//! ## Document shape
//!
//! ````text
//! # Gallery
//!
//! ## Entry: example-1
//!
//! ```bash
//! echo hi
//! ```
//!
//! ![Plot](example-1/plots/usage.png)
//!
//! ---
//! ````
//!
//! Entries render in input order; two calls with the same list produce
//! byte-identical output. The code block is omitted when the command text is
//! empty, and the image reference is omitted when no plot was resolved.

use crate::entry::GalleryEntry;
use std::path::Path;

/// Render the complete document for `entries`, in order.
///
/// `output_path` is where the document will be written; plot links are
/// expressed relative to its parent directory.
pub fn render_markdown(entries: &[GalleryEntry], output_path: &Path) -> String {
    let mut content = vec!["# Gallery\n".to_string()];
    for entry in entries {
        content.push(render_entry(entry, output_path));
    }
    content.join("\n")
}

fn render_entry(entry: &GalleryEntry, output_path: &Path) -> String {
    let mut sections = Vec::new();

    sections.push(format!("## Entry: {}\n", entry.name));

    if !entry.command_text.is_empty() {
        sections.push(format!("```bash\n{}\n```\n", entry.command_text));
    }

    if let Some(plot) = &entry.plot_path {
        sections.push(format!("![Plot]({})\n", link_target(output_path, plot)));
    }

    sections.push("---\n".to_string());

    sections.join("\n")
}

/// A link target for `target` relative to `output_path`'s directory.
///
/// When no relative path exists (say, a relative output path against an
/// absolute plot path) the absolute target is used as-is rather than
/// failing — a working-if-ugly link beats no document.
pub fn link_target(output_path: &Path, target: &Path) -> String {
    let base = output_path.parent().unwrap_or_else(|| Path::new(""));
    pathdiff::diff_paths(target, base)
        .unwrap_or_else(|| target.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, command_text: &str, plot: Option<PathBuf>) -> GalleryEntry {
        let path = PathBuf::from(format!("/gallery/{name}"));
        GalleryEntry {
            name: name.to_string(),
            setup_script: None,
            command_script: path.join("command.sh"),
            plots_dir: path.join("plots"),
            readme_file: None,
            command_text: command_text.to_string(),
            usage_json: None,
            plot_path: plot,
            path,
        }
    }

    #[test]
    fn round_trip_content() {
        let e = entry(
            "example-1",
            "echo hi",
            Some(PathBuf::from("/gallery/example-1/plots/usage.png")),
        );
        let doc = render_markdown(&[e], Path::new("/gallery/example-1/README.md"));

        assert!(doc.starts_with("# Gallery\n"));
        assert!(doc.contains("## Entry: example-1"));
        assert!(doc.contains("```bash\necho hi\n```"));
        assert!(doc.contains("![Plot](plots/usage.png)"));
        assert!(doc.contains("\n---\n"));
    }

    #[test]
    fn order_preserving() {
        let entries = vec![
            entry("zeta", "echo z", None),
            entry("alpha", "echo a", None),
        ];
        let doc = render_markdown(&entries, Path::new("/gallery/README.md"));

        let zeta = doc.find("## Entry: zeta").unwrap();
        let alpha = doc.find("## Entry: alpha").unwrap();
        assert!(zeta < alpha, "entries must render in input order");
    }

    #[test]
    fn idempotent_byte_identical() {
        let entries = vec![entry(
            "one",
            "echo hi",
            Some(PathBuf::from("/gallery/one/plots/usage.png")),
        )];
        let out = Path::new("/gallery/README.md");
        assert_eq!(
            render_markdown(&entries, out),
            render_markdown(&entries, out)
        );
    }

    #[test]
    fn empty_command_text_omits_code_block() {
        let doc = render_markdown(&[entry("quiet", "", None)], Path::new("/g/README.md"));
        assert!(!doc.contains("```"));
        assert!(doc.contains("## Entry: quiet"));
    }

    #[test]
    fn missing_plot_omits_image_reference() {
        let doc = render_markdown(&[entry("plotless", "echo hi", None)], Path::new("/g/README.md"));
        assert!(!doc.contains("![Plot]"));
    }

    #[test]
    fn plot_outside_output_tree_uses_parent_traversal() {
        let doc = render_markdown(
            &[entry(
                "far",
                "echo hi",
                Some(PathBuf::from("/elsewhere/plots/usage.png")),
            )],
            Path::new("/gallery/README.md"),
        );
        assert!(doc.contains("![Plot](../elsewhere/plots/usage.png)"));
    }

    #[test]
    fn unrelatable_plot_falls_back_to_absolute() {
        // Relative output base against an absolute target has no relative
        // form; the absolute target is used verbatim.
        let doc = render_markdown(
            &[entry(
                "abs",
                "echo hi",
                Some(PathBuf::from("/gallery/abs/plots/usage.png")),
            )],
            Path::new("README.md"),
        );
        assert!(doc.contains("![Plot](/gallery/abs/plots/usage.png)"));
    }

    #[test]
    fn two_entries_two_headings() {
        let entries = vec![
            entry("example-1", "echo 1", None),
            entry("example-2", "echo 2", None),
        ];
        let doc = render_markdown(&entries, Path::new("/g/README.md"));
        assert_eq!(doc.matches("## Entry:").count(), 2);
    }
}
