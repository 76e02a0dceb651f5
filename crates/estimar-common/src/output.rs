//! Table rendering and human-readable number formatting.

/// A rendered-on-demand text table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Column headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Render with box-drawing borders, numeric-looking cells right-aligned.
    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return String::new();
        }

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", segments.join(mid))
        };

        let line = |row: &[String]| {
            let cells: Vec<String> = (0..columns)
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let pad = widths[i] - cell.chars().count();
                    if looks_numeric(cell) {
                        format!(" {}{} ", " ".repeat(pad), cell)
                    } else {
                        format!(" {}{} ", cell, " ".repeat(pad))
                    }
                })
                .collect();
            format!("│{}│\n", cells.join("│"))
        };

        let mut out = border("┌", "┬", "┐");
        if !self.headers.is_empty() {
            out.push_str(&line(&self.headers));
            out.push_str(&border("├", "┼", "┤"));
        }
        for row in &self.rows {
            out.push_str(&line(row));
        }
        out.push_str(&border("└", "┴", "┘"));
        out
    }
}

fn looks_numeric(cell: &str) -> bool {
    let trimmed = cell.trim_start_matches(['$', '-']);
    trimmed.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Builder for [`Table`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    /// Start an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set column headers.
    pub fn headers(mut self, headers: Vec<&str>) -> Self {
        self.table.headers = headers.into_iter().map(str::to_string).collect();
        self
    }

    /// Append a row.
    pub fn row(mut self, row: Vec<&str>) -> Self {
        self.table.rows.push(row.into_iter().map(str::to_string).collect());
        self
    }

    /// Finish building.
    pub fn build(self) -> Table {
        self.table
    }
}

/// Format an integer with thousands separators.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a parameter count with a K/M/B/T suffix.
pub fn format_params(params: u64) -> String {
    if params >= 1_000_000_000_000 {
        format!("{:.2}T", params as f64 / 1e12)
    } else if params >= 1_000_000_000 {
        format!("{:.2}B", params as f64 / 1e9)
    } else if params >= 1_000_000 {
        format!("{:.1}M", params as f64 / 1e6)
    } else {
        format!("{:.1}K", params as f64 / 1e3)
    }
}

/// Format decimal gigabytes (1 GB = 1e9 bytes).
pub fn format_gb(gb: f64) -> String {
    if gb >= 1000.0 {
        format!("{:.2} TB", gb / 1000.0)
    } else if gb >= 1.0 {
        format!("{gb:.2} GB")
    } else {
        format!("{:.1} MB", gb * 1000.0)
    }
}
