//! Plain-text population table.

use crate::ga::Population;
use std::fmt;

/// Rows shown when no limit is set.
pub const DEFAULT_MAX_ROWS: usize = 10;

const HEADERS: [&str; 4] = ["n", "encoding", "decoded", "cost"];

/// Renders `(rank, genome, phenotype, cost)` rows with aligned columns.
///
/// ```
/// use u_bitga::driver::Table;
/// use u_bitga::ga::Population;
///
/// let pop = Population::default();
/// let text = Table::new(&pop).to_string();
/// assert!(text.starts_with("n"));
/// ```
pub struct Table<'a> {
    population: &'a Population,
    max_rows: usize,
    precision: usize,
}

impl<'a> Table<'a> {
    pub fn new(population: &'a Population) -> Self {
        Self {
            population,
            max_rows: DEFAULT_MAX_ROWS,
            precision: 3,
        }
    }

    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows;
        self
    }

    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = digits;
        self
    }

    fn rows(&self) -> Vec<[String; 4]> {
        let p = self.precision;
        self.population
            .iter()
            .take(self.max_rows)
            .map(|ind| {
                let decoded = ind
                    .phenotype
                    .iter()
                    .map(|v| format!("{v:.p$}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                [
                    ind.rank.to_string(),
                    ind.genome.to_string(),
                    format!("[{decoded}]"),
                    format!("{:.p$}", ind.cost),
                ]
            })
            .collect()
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        write_line(f, &widths, HEADERS)?;
        let rule = widths.map(|w| "-".repeat(w));
        write_line(f, &widths, [&rule[0], &rule[1], &rule[2], &rule[3]])?;
        for row in &rows {
            write_line(f, &widths, [&row[0], &row[1], &row[2], &row[3]])?;
        }
        Ok(())
    }
}

/// Numbers right-aligned, text left-aligned.
fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize; 4], cells: [&str; 4]) -> fmt::Result {
    writeln!(
        f,
        "{:>w0$}  {:<w1$}  {:<w2$}  {:>w3$}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Genome, Individual};

    fn population(n: usize) -> Population {
        let individuals = (0..n)
            .map(|i| Individual {
                rank: 0,
                genome: Genome::from_bits(&[1, 0, 1, 1]),
                phenotype: vec![10.0 + i as f64, -2.5],
                cost: 100.0 - i as f64 / 3.0,
            })
            .collect();
        Population::from_individuals(individuals)
    }

    #[test]
    fn test_renders_header_rule_and_rows() {
        let pop = population(2);
        let text = Table::new(&pop).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("encoding"));
        assert!(lines[1].chars().all(|c| c == '-' || c == ' '));
        // Sorted ascending: the lower cost comes first.
        assert!(lines[2].contains("99.667"));
        assert!(lines[2].contains("[11.000, -2.500]"));
        assert!(lines[2].contains("1011"));
        assert!(lines[3].contains("100.000"));
    }

    #[test]
    fn test_truncates_to_max_rows() {
        let pop = population(25);
        assert_eq!(Table::new(&pop).to_string().lines().count(), 2 + DEFAULT_MAX_ROWS);
        assert_eq!(
            Table::new(&pop).with_max_rows(3).to_string().lines().count(),
            5
        );
    }

    #[test]
    fn test_columns_aligned() {
        let pop = population(12);
        let text = Table::new(&pop).with_max_rows(12).to_string();
        let widths: Vec<usize> = text.lines().map(str::len).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_precision() {
        let pop = population(1);
        let text = Table::new(&pop).with_precision(1).to_string();
        assert!(text.contains("[10.0, -2.5]"));
        assert!(text.contains("100.0"));
    }
}
