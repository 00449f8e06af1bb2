//! Printable summary of a fitted model

use std::fmt;

const WIDTH: usize = 78;

/// Width of one numeric column in the coefficient table
const CELL: usize = 10;

/// One row of the coefficient table
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    pub name: String,
    pub coef: f64,
    pub std_err: f64,
    pub z: f64,
    pub p_value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Fit statistics and coefficient table of a fitted model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    /// Dependent variable label (e.g. `D.y`)
    pub dep_variable: String,
    /// Model label (e.g. `ARIMA(9, 1, 3)`)
    pub model: String,
    /// Estimation method
    pub method: String,
    /// Observations in the differenced series
    pub nobs: usize,
    pub log_likelihood: f64,
    /// Standard deviation of the innovations
    pub sigma: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    /// Whether the optimizer met its tolerance
    pub converged: bool,
    /// Optimizer iterations
    pub iterations: usize,
    pub coefficients: Vec<CoefficientRow>,
}

impl ModelSummary {
    /// Look up a coefficient row by name
    pub fn coefficient(&self, name: &str) -> Option<&CoefficientRow> {
        self.coefficients.iter().find(|row| row.name == name)
    }
}

/// Fixed-point when it leaves room for a separating space, scientific otherwise
fn cell(value: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, value);
    let text = if fixed.len() < CELL {
        fixed
    } else {
        format!("{:.*e}", precision.min(3), value)
    };
    format!("{:>w$}", text, w = CELL)
}

fn pair(f: &mut fmt::Formatter<'_>, left: (&str, String), right: (&str, String)) -> fmt::Result {
    let half = WIDTH / 2;
    let left_cell = if left.0.is_empty() {
        " ".repeat(half)
    } else {
        let pad = half - 1 - left.0.len();
        format!("{:<w$}", format!("{}{:>pad$}", left.0, left.1), w = half)
    };
    writeln!(
        f,
        "{}{}{:>pad$}",
        left_cell,
        right.0,
        right.1,
        pad = WIDTH - half - right.0.len()
    )
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:^w$}", "ARIMA Model Results", w = WIDTH)?;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        pair(
            f,
            ("Dep. Variable:", self.dep_variable.clone()),
            ("No. Observations:", self.nobs.to_string()),
        )?;
        pair(
            f,
            ("Model:", self.model.clone()),
            ("Log Likelihood", format!("{:.3}", self.log_likelihood)),
        )?;
        pair(
            f,
            ("Method:", self.method.clone()),
            ("S.D. of innovations", format!("{:.3}", self.sigma)),
        )?;
        pair(
            f,
            ("Converged:", if self.converged { "yes" } else { "no" }.to_string()),
            ("AIC", format!("{:.3}", self.aic)),
        )?;
        pair(
            f,
            ("Iterations:", self.iterations.to_string()),
            ("BIC", format!("{:.3}", self.bic)),
        )?;
        pair(f, ("", String::new()), ("HQIC", format!("{:.3}", self.hqic)))?;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(
            f,
            "{:<18}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]"
        )?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for row in &self.coefficients {
            writeln!(
                f,
                "{:<18}{}{}{}{}{}{}",
                row.name,
                cell(row.coef, 4),
                cell(row.std_err, 3),
                cell(row.z, 3),
                cell(row.p_value, 3),
                cell(row.lower, 3),
                cell(row.upper, 3)
            )?;
        }
        write!(f, "{}", "=".repeat(WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_layout() {
        let summary = ModelSummary {
            dep_variable: "D.y".to_string(),
            model: "ARIMA(1, 1, 0)".to_string(),
            method: "css".to_string(),
            nobs: 99,
            log_likelihood: -120.5,
            sigma: 0.9,
            aic: 247.0,
            bic: 254.8,
            hqic: 250.1,
            converged: true,
            iterations: 42,
            coefficients: vec![CoefficientRow {
                name: "ar.L1.D.y".to_string(),
                coef: 0.5,
                std_err: 0.1,
                z: 5.0,
                p_value: 0.0,
                lower: 0.304,
                upper: 0.696,
            }],
        };
        let text = summary.to_string();
        assert!(text.contains("ARIMA Model Results"));
        assert!(text.contains("ARIMA(1, 1, 0)"));
        assert!(text.contains("ar.L1.D.y"));
        assert!(text.contains("-120.500"));
        for line in text.lines().skip(1) {
            assert!(line.chars().count() <= WIDTH, "line too wide: {:?}", line);
        }
        assert!(summary.coefficient("ar.L1.D.y").is_some());
        assert!(summary.coefficient("ma.L1.D.y").is_none());
    }

    #[test]
    fn test_large_statistics_keep_columns_apart() {
        assert_eq!(cell(5.0, 3), "     5.000");
        assert_eq!(cell(316133.132, 3), "   3.161e5");

        let summary = ModelSummary {
            dep_variable: "D.y".to_string(),
            model: "ARIMA(1, 0, 0)".to_string(),
            method: "css".to_string(),
            nobs: 50,
            log_likelihood: 310.2,
            sigma: 1e-4,
            aic: -616.4,
            bic: -610.7,
            hqic: -614.2,
            converged: true,
            iterations: 80,
            coefficients: vec![CoefficientRow {
                name: "ar.L1.D.y".to_string(),
                coef: 0.99,
                std_err: 0.0000031,
                z: 316133.132,
                p_value: 0.0,
                lower: 0.98999,
                upper: 0.99001,
            }],
        };
        let text = summary.to_string();
        let row = text
            .lines()
            .find(|line| line.starts_with("ar.L1.D.y"))
            .unwrap();
        assert_eq!(row.chars().count(), 18 + 6 * CELL);
        assert!(row.contains(" 3.161e5 "));
        assert_eq!(row[18..].split_whitespace().count(), 6);
    }
}
