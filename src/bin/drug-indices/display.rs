use std::io::{self, Write};

use anyhow::Error;

use drug_indices::pipeline::BatchEntry;
use drug_indices::BatchResults;

const NAME_WIDTH: usize = 24;

/// Per-compound summary table, written to stderr so stdout stays clean.
pub fn print_batch_summary(batch: &BatchResults) {
    let mut out = io::stderr().lock();
    let _ = write_batch_summary(&mut out, batch);
}

fn write_batch_summary(out: &mut impl Write, batch: &BatchResults) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {:<w$} {:>6} {:>6} {:>5} {:>5} {:>8}  {}",
        "Compound",
        "Atoms",
        "Bonds",
        "Frags",
        "Diam",
        "Wiener",
        "Status",
        w = NAME_WIDTH
    )?;
    writeln!(out, "  {}", "─".repeat(NAME_WIDTH + 46))?;

    for entry in batch.entries() {
        match entry {
            BatchEntry::Computed(c) => {
                let s = &c.summary;
                let diameter = s.diameter.map_or_else(|| "-".to_string(), |d| d.to_string());
                let status = if c.record.degenerate().is_empty() {
                    "ok".to_string()
                } else {
                    let keys: Vec<_> = c.record.degenerate().iter().map(|k| k.key()).collect();
                    format!("ok (degenerate: {})", keys.join(", "))
                };
                writeln!(
                    out,
                    "  {:<w$} {:>6} {:>6} {:>5} {:>5} {:>8}  {}",
                    truncate(&c.name, NAME_WIDTH),
                    s.atoms,
                    s.bonds,
                    s.components,
                    diameter,
                    s.wiener,
                    status,
                    w = NAME_WIDTH
                )?;
            }
            BatchEntry::Skipped(s) => {
                writeln!(
                    out,
                    "  {:<w$} {:>6} {:>6} {:>5} {:>5} {:>8}  skipped: {}",
                    truncate(&s.name, NAME_WIDTH),
                    "-",
                    "-",
                    "-",
                    "-",
                    "-",
                    s.reason,
                    w = NAME_WIDTH
                )?;
            }
        }
    }

    writeln!(
        out,
        "\n  {} computed, {} skipped\n",
        batch.computed_count(),
        batch.skipped_count()
    )
}

/// Error message followed by its cause chain.
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error: {}", err);
    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "  caused by: {}", cause);
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('…');
        out
    }
}
