use crate::error::ReportError;
use crate::format::{HEADERS, cells};
use analytics::SummaryRow;
use std::fs;
use std::path::Path;
use tracing::info;

/// Escapes the characters LaTeX treats specially.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the summary as a booktabs `tabular` block.
pub fn render_latex(rows: &[SummaryRow]) -> String {
    let mut tex = String::new();
    tex.push_str("\\begin{tabular}{lllrrrrrr}\n");
    tex.push_str("\\toprule\n");
    tex.push_str(&HEADERS.join(" & "));
    tex.push_str(" \\\\\n\\midrule\n");

    for row in rows {
        let line = cells(row).iter().map(|cell| escape(cell)).collect::<Vec<_>>().join(" & ");
        tex.push_str(&line);
        tex.push_str(" \\\\\n");
    }

    tex.push_str("\\bottomrule\n");
    tex.push_str("\\end{tabular}\n");
    tex
}

/// Writes the LaTeX block; the parent directory must already exist.
pub fn write_latex(rows: &[SummaryRow], path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;
    fs::write(path, render_latex(rows)).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote LaTeX table with {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(ReportError::MissingDirectory(dir.to_path_buf()))
        }
        _ => Ok(()),
    }
}
