//! Evaluation of generated data modules.
//!
//! Parses a module body with oxc and folds its default export back into a
//! [`Value`]. Only plain data literals are understood, which is exactly what
//! [`crate::literal`] produces; anything else is reported as unsupported.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpressionElement, Expression, ObjectPropertyKind, PropertyKey, PropertyKind, Statement,
};
use oxc_parser::Parser;
use oxc_span::SourceType;

use quire_yaml::{Mapping, Number, Value};

/// Errors that can occur when evaluating a module.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Module has no default export")]
    MissingDefaultExport,

    #[error("Unsupported construct: {0}")]
    Unsupported(String),

    #[error("A bare __proto__ key sets the prototype instead of defining a property")]
    ProtoKey,

    #[error("Duplicate property: {0}")]
    DuplicateKey(String),
}

/// Evaluate the default export of a data-only module.
pub fn evaluate_module(code: &str) -> Result<Value, EvalError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();

    if let Some(err) = parsed.errors.first() {
        return Err(EvalError::Parse(err.to_string()));
    }

    let mut export = None;
    for statement in &parsed.program.body {
        match statement {
            Statement::ExportDefaultDeclaration(decl) => {
                let expr = decl.declaration.as_expression().ok_or_else(|| {
                    EvalError::Unsupported("default export of a declaration".to_string())
                })?;
                export = Some(evaluate(expr)?);
            }
            Statement::EmptyStatement(_) => {}
            _ => {
                return Err(EvalError::Unsupported(
                    "statement other than `export default`".to_string(),
                ))
            }
        }
    }

    export.ok_or(EvalError::MissingDefaultExport)
}

fn evaluate(expr: &Expression<'_>) -> Result<Value, EvalError> {
    match expr {
        Expression::NullLiteral(_) => Ok(Value::Null),
        Expression::BooleanLiteral(lit) => Ok(Value::Bool(lit.value)),
        Expression::NumericLiteral(lit) => Ok(Value::Number(Number::Float(lit.value))),
        Expression::StringLiteral(lit) => Ok(Value::String(lit.value.to_string())),
        Expression::Identifier(ident) => match ident.name.as_str() {
            "Infinity" => Ok(Value::Number(Number::Float(f64::INFINITY))),
            "NaN" => Ok(Value::Number(Number::Float(f64::NAN))),
            name => Err(EvalError::Unsupported(format!("identifier `{name}`"))),
        },
        Expression::UnaryExpression(unary) if unary.operator.as_str() == "-" => {
            match evaluate(&unary.argument)? {
                Value::Number(n) => Ok(Value::Number(Number::Float(-n.as_f64()))),
                other => Err(EvalError::Unsupported(format!(
                    "negation of a {}",
                    other.kind()
                ))),
            }
        }
        Expression::ParenthesizedExpression(inner) => evaluate(&inner.expression),
        Expression::ArrayExpression(array) => array
            .elements
            .iter()
            .map(evaluate_element)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Expression::ObjectExpression(object) => {
            let mut map = Mapping::new();
            for property in &object.properties {
                let ObjectPropertyKind::ObjectProperty(prop) = property else {
                    return Err(EvalError::Unsupported("spread property".to_string()));
                };
                if !matches!(prop.kind, PropertyKind::Init) || prop.method {
                    return Err(EvalError::Unsupported("accessor or method".to_string()));
                }

                let key = property_key(&prop.key, prop.computed)?;
                let value = evaluate(&prop.value)?;
                if !map.insert_new(key.clone(), value) {
                    return Err(EvalError::DuplicateKey(key));
                }
            }
            Ok(Value::Mapping(map))
        }
        _ => Err(EvalError::Unsupported("non-literal expression".to_string())),
    }
}

fn evaluate_element(element: &ArrayExpressionElement<'_>) -> Result<Value, EvalError> {
    match element.as_expression() {
        Some(expr) => evaluate(expr),
        None => Err(EvalError::Unsupported("array hole or spread".to_string())),
    }
}

fn property_key(key: &PropertyKey<'_>, computed: bool) -> Result<String, EvalError> {
    match key {
        PropertyKey::StaticIdentifier(ident) if !computed => {
            if ident.name.as_str() == "__proto__" {
                return Err(EvalError::ProtoKey);
            }
            Ok(ident.name.to_string())
        }
        PropertyKey::StringLiteral(lit) => {
            if !computed && lit.value.as_str() == "__proto__" {
                return Err(EvalError::ProtoKey);
            }
            Ok(lit.value.to_string())
        }
        PropertyKey::NumericLiteral(lit) => Ok(Number::Float(lit.value).to_property_key()),
        _ => Err(EvalError::Unsupported("property key".to_string())),
    }
}
