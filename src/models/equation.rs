//! Human-readable equations with fitted coefficients substituted.

use crate::domain::ModelKind;

/// Render `y = ...` for a family and its coefficients.
pub fn equation_string(model: ModelKind, coefficients: &[f64]) -> String {
    if !model.accepts_coefficients(coefficients.len()) {
        return format!("y = ? ({} coefficients for {})", coefficients.len(), model.label());
    }
    match model {
        ModelKind::Linear | ModelKind::Quadratic | ModelKind::Cubic | ModelKind::Quartic => {
            format!("y = {}", polynomial_terms(coefficients))
        }
        ModelKind::Exponential => format!(
            "y = {}·e^({}x)",
            fmt_coef(coefficients[0]),
            fmt_coef(coefficients[1])
        ),
        ModelKind::Logarithmic => format!(
            "y = {}{}·ln(x)",
            fmt_coef(coefficients[0]),
            signed(coefficients[1])
        ),
        ModelKind::Power => format!(
            "y = {}·x^{}",
            fmt_coef(coefficients[0]),
            fmt_coef(coefficients[1])
        ),
    }
}

fn polynomial_terms(coefficients: &[f64]) -> String {
    let degree = coefficients.len() - 1;
    let mut out = String::new();
    for (i, &c) in coefficients.iter().enumerate() {
        let power = degree - i;
        if i == 0 {
            out.push_str(&fmt_coef(c));
        } else {
            out.push_str(&signed(c));
        }
        match power {
            0 => {}
            1 => out.push('x'),
            _ => out.push_str(&format!("x^{power}")),
        }
    }
    out
}

/// ` + c` / ` - |c|` for non-leading terms.
fn signed(value: f64) -> String {
    if value.is_sign_negative() && value != 0.0 {
        format!(" - {}", fmt_coef(-value))
    } else {
        format!(" + {}", fmt_coef(value))
    }
}

fn fmt_coef(value: f64) -> String {
    let abs = value.abs();
    if value == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e5).contains(&abs) {
        format!("{value:.4e}")
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_equation_lists_terms_highest_first() {
        assert_eq!(
            equation_string(ModelKind::Quadratic, &[2.0, -3.5, 1.0]),
            "y = 2.0000x^2 - 3.5000x + 1.0000"
        );
        assert_eq!(equation_string(ModelKind::Linear, &[2.0, 0.0]), "y = 2.0000x + 0");
        assert_eq!(
            equation_string(ModelKind::Quartic, &[1.0, -2.0, 0.5, 3.0]),
            "y = 1.0000x^3 - 2.0000x^2 + 0.5000x + 3.0000"
        );
    }

    #[test]
    fn transformed_equations() {
        assert_eq!(
            equation_string(ModelKind::Exponential, &[1.5, -0.25]),
            "y = 1.5000·e^(-0.2500x)"
        );
        assert_eq!(
            equation_string(ModelKind::Logarithmic, &[1.0, -2.0]),
            "y = 1.0000 - 2.0000·ln(x)"
        );
        assert_eq!(equation_string(ModelKind::Power, &[3.0, 0.5]), "y = 3.0000·x^0.5000");
    }

    #[test]
    fn extreme_magnitudes_use_scientific_notation() {
        let eq = equation_string(ModelKind::Linear, &[1.0e-6, 2.5e7]);
        assert_eq!(eq, "y = 1.0000e-6x + 2.5000e7");
    }
}
