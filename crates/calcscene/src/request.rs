//! Requests sent to the computation service.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Variable a partial derivative is taken with respect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    X,
    Y,
    Z,
}

/// Operations understood by the computation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `z = f(x, y)` sampled on a grid.
    Surface,
    /// Symbolic partial derivative.
    Derivative(Variable),
    /// Integral over `[-1, 1]^2`.
    DoubleIntegral,
    /// Integral over `[-1, 1]^3`.
    TripleIntegral,
    /// Numeric domain/range estimate on a grid.
    DomainRange,
    /// Iterated limits towards `(a, b)`.
    Limit,
    /// Numeric gradient at `(x0, y0)`.
    Gradient,
    /// Constrained extrema with `g(x, y) = c`.
    Lagrange,
    /// Gradient sampled over a rectangle.
    GradientField,
    /// Isosurface `f(x, y, z) = iso_value`.
    ImplicitSurface,
    /// Anything else, carried verbatim.
    Other(String),
}

impl Operation {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Surface => "superficie",
            Operation::Derivative(Variable::X) => "derivada_x",
            Operation::Derivative(Variable::Y) => "derivada_y",
            Operation::Derivative(Variable::Z) => "derivada_z",
            Operation::DoubleIntegral => "integral_doble",
            Operation::TripleIntegral => "integral_triple",
            Operation::DomainRange => "dominio_rango",
            Operation::Limit => "limite",
            Operation::Gradient => "gradiente",
            Operation::Lagrange => "lagrange",
            Operation::GradientField => "campo_gradiente",
            Operation::ImplicitSurface => "superficie_implicita",
            Operation::Other(name) => name,
        }
    }

    /// True for operations whose answer is a number or expression rather
    /// than geometry.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Operation::Derivative(_)
                | Operation::DoubleIntegral
                | Operation::TripleIntegral
                | Operation::DomainRange
                | Operation::Limit
                | Operation::Gradient
                | Operation::Lagrange
        )
    }
}

impl FromStr for Operation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "superficie" => Operation::Surface,
            "derivada_x" => Operation::Derivative(Variable::X),
            "derivada_y" => Operation::Derivative(Variable::Y),
            "derivada_z" => Operation::Derivative(Variable::Z),
            "integral_doble" => Operation::DoubleIntegral,
            "integral_triple" => Operation::TripleIntegral,
            "dominio_rango" => Operation::DomainRange,
            "limite" => Operation::Limit,
            "gradiente" => Operation::Gradient,
            "lagrange" => Operation::Lagrange,
            "campo_gradiente" => Operation::GradientField,
            "superficie_implicita" => Operation::ImplicitSurface,
            other => Operation::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request: an expression, an operation and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeRequest {
    expression: String,
    operation: Operation,
    params: BTreeMap<String, String>,
}

impl ComputeRequest {
    pub fn new(expression: impl Into<String>, operation: Operation) -> Self {
        Self {
            expression: expression.into(),
            operation,
            params: BTreeMap::new(),
        }
    }

    /// Adds a parameter. Blank values are dropped, as an empty form field
    /// would be.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.params.insert(name.into(), value);
        }
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Parameter parsed as a number; `None` when missing or unparsable.
    pub fn param_f64(&self, name: &str) -> Option<f64> {
        self.param(name)?.trim().parse().ok()
    }

    /// Replaces a blank expression with `default`.
    pub(crate) fn fill_default_expression(&mut self, default: &str) {
        if self.expression.trim().is_empty() {
            self.expression = default.to_string();
        }
    }

    /// Query pairs: `expr`, `op`, then parameters in name order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len() + 2);
        pairs.push(("expr".to_string(), self.expression.clone()));
        pairs.push(("op".to_string(), self.operation.as_str().to_string()));
        pairs.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_round_trip() {
        for op in [
            Operation::Surface,
            Operation::Derivative(Variable::Y),
            Operation::TripleIntegral,
            Operation::GradientField,
            Operation::ImplicitSurface,
        ] {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(
            "rotacional".parse::<Operation>().unwrap(),
            Operation::Other("rotacional".into())
        );
    }

    #[test]
    fn blank_params_are_dropped() {
        let req = ComputeRequest::new("x*y", Operation::Gradient)
            .with_param("x0", 1.5)
            .with_param("z0", "  ");
        assert_eq!(req.param_f64("x0"), Some(1.5));
        assert!(req.param("z0").is_none());
    }

    #[test]
    fn query_order_is_stable() {
        let req = ComputeRequest::new("x^2", Operation::Limit)
            .with_param("b", 0)
            .with_param("a", 1);
        let keys: Vec<_> = req.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["expr", "op", "a", "b"]);
    }

    #[test]
    fn default_expression_fills_blank() {
        let mut req = ComputeRequest::new("  ", Operation::Surface);
        req.fill_default_expression("x^2+y^2");
        assert_eq!(req.expression(), "x^2+y^2");
        let mut req = ComputeRequest::new("sin(x)", Operation::Surface);
        req.fill_default_expression("x^2+y^2");
        assert_eq!(req.expression(), "sin(x)");
    }
}
