use hcl::expr::{Expression, ObjectKey};
use hcl::{Block, Body, Structure};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to turn configuration text into a tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(#[from] hcl::Error),
    #[error("unrepresentable number literal: {0}")]
    Number(#[from] serde_json::Error),
}

/// Parse Terraform source into the nested tree the scanner walks.
///
/// Top-level block identifiers (`data`, `resource`, ...) map to an ordered
/// list with one entry per block. Each block label nests one object level,
/// attributes are wrapped in a one-element list and repeated nested blocks
/// collect into a list of bodies.
pub fn parse_config_content(content: &str) -> Result<Value, ParseError> {
    let body = hcl::parse(content)?;
    let mut root = Map::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                root.insert(
                    attr.key.to_string(),
                    Value::Array(vec![convert_expression(&attr.expr)?]),
                );
            }
            Structure::Block(block) => {
                let entry = convert_labelled_block(block)?;
                push_entry(&mut root, block.identifier.as_str(), entry);
            }
        }
    }
    Ok(Value::Object(root))
}

fn push_entry(map: &mut Map<String, Value>, key: &str, entry: Value) {
    match map.get_mut(key) {
        Some(Value::Array(entries)) => entries.push(entry),
        _ => {
            map.insert(key.to_string(), Value::Array(vec![entry]));
        }
    }
}

fn convert_labelled_block(block: &Block) -> Result<Value, ParseError> {
    let mut value = convert_body(&block.body)?;
    for label in block.labels.iter().rev() {
        let mut wrapper = Map::new();
        wrapper.insert(label.as_str().to_string(), value);
        value = Value::Object(wrapper);
    }
    Ok(value)
}

fn convert_body(body: &Body) -> Result<Value, ParseError> {
    let mut map = Map::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                map.insert(
                    attr.key.to_string(),
                    Value::Array(vec![convert_expression(&attr.expr)?]),
                );
            }
            Structure::Block(block) => {
                let entry = convert_labelled_block(block)?;
                push_entry(&mut map, block.identifier.as_str(), entry);
            }
        }
    }
    Ok(Value::Object(map))
}

/// Convert an expression to JSON. Anything that needs evaluation is kept
/// as an interpolation string (`${...}`). `jsonencode` of an object or
/// list literal stays structured so it is never mistaken for escaped text.
fn convert_expression(expr: &Expression) -> Result<Value, ParseError> {
    let value = match expr {
        Expression::Null => Value::Null,
        Expression::Bool(b) => Value::Bool(*b),
        Expression::Number(n) => serde_json::to_value(n)?,
        Expression::String(s) => Value::String(s.clone()),
        Expression::Array(items) => Value::Array(
            items
                .iter()
                .map(convert_expression)
                .collect::<Result<_, _>>()?,
        ),
        Expression::Object(object) => {
            let mut map = Map::new();
            for (key, value) in object.iter() {
                map.insert(object_key(key)?, convert_expression(value)?);
            }
            Value::Object(map)
        }
        Expression::TemplateExpr(template) => Value::String(template.to_string()),
        Expression::Parenthesis(inner) => convert_expression(inner)?,
        Expression::FuncCall(func)
            if func.name.to_string() == "jsonencode" && func.args.len() == 1 =>
        {
            match convert_expression(&func.args[0])? {
                encoded @ (Value::Object(_) | Value::Array(_)) => encoded,
                _ => Value::String(format!("${{{}}}", expr)),
            }
        }
        other => Value::String(format!("${{{}}}", other)),
    };
    Ok(value)
}

fn object_key(key: &ObjectKey) -> Result<String, ParseError> {
    Ok(match key {
        ObjectKey::Identifier(ident) => ident.to_string(),
        ObjectKey::Expression(expr) => match convert_expression(expr)? {
            Value::String(s) => s,
            other => other.to_string(),
        },
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labelled_blocks_nest_per_label() {
        let tree = parse_config_content(
            r#"
data "aws_iam_policy_document" "read" {
  statement {
    actions   = ["s3:GetObject"]
    resources = ["*"]
  }
}
"#,
        )
        .unwrap();
        let statement = &tree["data"][0]["aws_iam_policy_document"]["read"]["statement"][0];
        assert_eq!(statement["actions"], json!([["s3:GetObject"]]));
        assert_eq!(statement["resources"], json!([["*"]]));
    }

    #[test]
    fn test_repeated_blocks_collect_in_order() {
        let tree = parse_config_content(
            r#"
data "aws_iam_policy_document" "doc" {
  statement {
    sid = "first"
  }
  statement {
    sid = "second"
  }
}
"#,
        )
        .unwrap();
        let statements = tree["data"][0]["aws_iam_policy_document"]["doc"]["statement"]
            .as_array()
            .unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0]["sid"], json!(["first"]));
        assert_eq!(statements[1]["sid"], json!(["second"]));
    }

    #[test]
    fn test_each_top_level_block_is_its_own_entry() {
        let tree = parse_config_content(
            r#"
resource "aws_iam_policy" "a" {
  name = "a"
}
resource "aws_s3_bucket" "b" {
  bucket = "b"
}
"#,
        )
        .unwrap();
        let resources = tree["resource"].as_array().unwrap();
        assert_eq!(resources.len(), 2);
        assert!(resources[0].get("aws_iam_policy").is_some());
        assert!(resources[1].get("aws_s3_bucket").is_some());
    }

    #[test]
    fn test_interpolations_survive_as_placeholders() {
        let tree = parse_config_content(
            r#"
data "aws_iam_policy_document" "doc" {
  statement {
    resources = ["arn:aws:s3:::${var.bucket}/*", aws_s3_bucket.logs.arn]
  }
}
"#,
        )
        .unwrap();
        let resources =
            &tree["data"][0]["aws_iam_policy_document"]["doc"]["statement"][0]["resources"][0];
        assert_eq!(resources[0], json!("arn:aws:s3:::${var.bucket}/*"));
        assert_eq!(resources[1], json!("${aws_s3_bucket.logs.arn}"));
    }

    #[test]
    fn test_jsonencode_keeps_structure() {
        let tree = parse_config_content(
            r#"
resource "aws_iam_policy" "p" {
  policy = jsonencode({
    Version = "2012-10-17"
    Statement = [{ Effect = "Allow", Action = "*", Resource = format("arn:aws:s3:::%s/*", var.bucket) }]
  })
}
"#,
        )
        .unwrap();
        let policy = &tree["resource"][0]["aws_iam_policy"]["p"]["policy"][0];
        assert_eq!(policy["Statement"][0]["Action"], json!("*"));
        let resource = policy["Statement"][0]["Resource"].as_str().unwrap();
        assert!(resource.starts_with("${format(\"arn:aws:s3:::%s/*\""), "{}", resource);
    }

    #[test]
    fn test_jsonencode_of_reference_is_interpolation() {
        let tree = parse_config_content(
            "resource \"aws_iam_policy\" \"p\" {\n  policy = jsonencode(var.policy)\n}\n",
        )
        .unwrap();
        let policy = tree["resource"][0]["aws_iam_policy"]["p"]["policy"][0]
            .as_str()
            .unwrap();
        assert!(policy.starts_with("${jsonencode("), "{}", policy);
    }

    #[test]
    fn test_heredoc_keeps_template_text() {
        let tree = parse_config_content(
            "resource \"aws_iam_policy\" \"p\" {\n  policy = <<EOF\n{\"Version\": \"2012-10-17\"}\nEOF\n}\n",
        )
        .unwrap();
        let policy = tree["resource"][0]["aws_iam_policy"]["p"]["policy"][0]
            .as_str()
            .unwrap();
        assert!(policy.contains("\"Version\": \"2012-10-17\""));
    }

    #[test]
    fn test_syntax_error() {
        let result = parse_config_content("resource \"aws_iam_policy\" {\n  policy = \n");
        assert!(matches!(result, Err(ParseError::Syntax(_))));
    }
}
