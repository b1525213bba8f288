//! Parse schema source into the schema model using PEST.

use crate::ast::*;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct SchemaParser;

/// Parse schema source into a [`Schema`]. Field order is kept as written.
pub fn parse(source: &str) -> Result<Schema, String> {
    let pairs = SchemaParser::parse(Rule::schema, source)
        .map_err(|e| format!("Parse error: {}", e))?;
    let pair = pairs.into_iter().next().ok_or("Empty parse")?;
    build_schema(pair)
}

fn build_schema(pair: pest::iterators::Pair<Rule>) -> Result<Schema, String> {
    let mut types = Vec::new();
    let mut messages = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::type_decl => types.push(build_type_decl(inner)?),
            Rule::message_decl => messages.push(build_message(inner)?),
            _ => {}
        }
    }

    Ok(Schema { types, messages })
}

fn build_type_decl(pair: pest::iterators::Pair<Rule>) -> Result<TypeDecl, String> {
    let mut name = None;
    let mut declaration = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = Some(inner.as_str().to_string()),
            Rule::string_lit => {
                let text = inner
                    .into_inner()
                    .next()
                    .map(|p| p.as_str().trim().to_string())
                    .unwrap_or_default();
                declaration = Some(text);
            }
            _ => {}
        }
    }
    let name = name.ok_or("type: missing name")?;
    let declaration = declaration.ok_or("type: missing declaration")?;
    if declaration.is_empty() {
        return Err(format!("type {}: empty declaration", name));
    }
    Ok(TypeDecl { name, declaration })
}

fn build_message(pair: pest::iterators::Pair<Rule>) -> Result<MessageSpec, String> {
    let mut name = String::new();
    let mut id = None;
    let mut fields = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = inner.as_str().to_string(),
            Rule::number => id = Some(parse_number(inner.as_str())?),
            Rule::field => fields.push(build_field(inner)?),
            _ => {}
        }
    }
    let id = id.ok_or_else(|| format!("message {}: missing id", name))?;
    Ok(MessageSpec { id, name, fields })
}

fn build_field(pair: pest::iterators::Pair<Rule>) -> Result<Field, String> {
    let mut it = pair.into_inner();
    let name = it.next().ok_or("field: name")?.as_str().to_string();
    let spec = it.next().ok_or("field: type")?;
    let (type_ref, cardinality) = build_type_spec(spec)?;
    Ok(Field {
        name,
        type_ref,
        cardinality,
    })
}

fn build_type_spec(pair: pest::iterators::Pair<Rule>) -> Result<(String, Cardinality), String> {
    let inner = pair.into_inner().next().ok_or("Empty type_spec")?;
    match inner.as_rule() {
        Rule::ident => Ok((inner.as_str().to_string(), Cardinality::Required)),
        Rule::optional_type => {
            let id = inner.into_inner().next().ok_or("optional<T>")?.as_str().to_string();
            Ok((id, Cardinality::Optional))
        }
        Rule::list_type => {
            let id = inner.into_inner().next().ok_or("list<T>")?.as_str().to_string();
            Ok((id, Cardinality::Repeated))
        }
        other => Err(format!("Unhandled type rule: {:?}", other)),
    }
}

fn parse_number(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("Invalid message id {}: {}", s, e))
}
