//! Built-in C++ templates: a header/source pair for messages and one for the
//! transport surface.
//!
//! Generated code expects `Bytes`, `BytesSpan`, `AsUintVar` and the
//! `operator<<`/`operator>>` overloads for optional and vector members to come
//! from the configured includes.

use crate::alias::{AliasMap, RepeatAliasMap};
use crate::ast::{Cardinality, Field, MessageSpec, PrimitiveType};
use crate::discard::DiscardSet;
use crate::error::GenError;
use crate::template::{
    ArtifactContext, ArtifactKind, Section, Template, TemplateSet,
};

/// Enum type emitted in the message interface.
pub const MESSAGE_TYPE_ENUM: &str = "MessageType";
/// Class emitted by the transport interface.
pub const TRANSPORT_CLASS: &str = "Transport";

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "auto", "bool", "break", "case", "catch", "char", "class",
    "const", "continue", "default", "delete", "do", "double", "else", "enum", "explicit",
    "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int",
    "long", "mutable", "namespace", "new", "not", "operator", "or", "private", "protected",
    "public", "register", "return", "short", "signed", "sizeof", "static", "struct", "switch",
    "template", "this", "throw", "true", "try", "typedef", "typename", "union", "unsigned",
    "using", "virtual", "void", "volatile", "while",
];

/// Registers a template for every section of every artifact kind.
pub fn template_set() -> Result<TemplateSet, GenError> {
    use ArtifactKind::*;

    let mut set = TemplateSet::new();
    set.insert(MessageInterface.key(Section::Prologue), Template::Prologue(header_prologue))?;
    set.insert(MessageInterface.key(Section::Aliases), Template::Aliases(header_aliases))?;
    set.insert(MessageInterface.key(Section::Enums), Template::Enums(header_enums))?;
    set.insert(MessageInterface.key(Section::Message), Template::PerMessage(header_struct))?;
    set.insert(MessageInterface.key(Section::Epilogue), Template::Epilogue(header_epilogue))?;

    set.insert(MessageImplementation.key(Section::Prologue), Template::Prologue(source_prologue))?;
    set.insert(MessageImplementation.key(Section::Aliases), Template::Aliases(source_aliases))?;
    set.insert(MessageImplementation.key(Section::Codec), Template::PerMessage(source_codec))?;
    set.insert(MessageImplementation.key(Section::Epilogue), Template::Epilogue(source_epilogue))?;

    set.insert(TransportInterface.key(Section::Prologue), Template::Prologue(transport_header_prologue))?;
    set.insert(TransportInterface.key(Section::Message), Template::PerMessage(transport_header_methods))?;
    set.insert(TransportInterface.key(Section::Epilogue), Template::Epilogue(transport_header_epilogue))?;

    set.insert(TransportImplementation.key(Section::Prologue), Template::Prologue(source_prologue))?;
    set.insert(TransportImplementation.key(Section::Codec), Template::PerMessage(transport_source_methods))?;
    set.insert(TransportImplementation.key(Section::Epilogue), Template::Epilogue(source_epilogue))?;
    Ok(set)
}

/// Member name for a schema field; C++ keywords get a trailing underscore.
pub fn member_name(field: &str) -> String {
    if CPP_KEYWORDS.contains(&field) {
        format!("{}_", field)
    } else {
        field.to_string()
    }
}

fn element_type(type_ref: &str) -> String {
    match PrimitiveType::from_name(type_ref) {
        Some(PrimitiveType::U8) => "std::uint8_t".to_string(),
        Some(PrimitiveType::U16) => "std::uint16_t".to_string(),
        Some(PrimitiveType::U32) => "std::uint32_t".to_string(),
        Some(PrimitiveType::U64) | Some(PrimitiveType::Varint) => "std::uint64_t".to_string(),
        Some(PrimitiveType::I8) => "std::int8_t".to_string(),
        Some(PrimitiveType::I16) => "std::int16_t".to_string(),
        Some(PrimitiveType::I32) => "std::int32_t".to_string(),
        Some(PrimitiveType::I64) => "std::int64_t".to_string(),
        Some(PrimitiveType::Bool) => "bool".to_string(),
        Some(PrimitiveType::Bytes) => "Bytes".to_string(),
        Some(PrimitiveType::String) => "std::string".to_string(),
        None => type_ref.to_string(),
    }
}

/// Declared C++ type of a field, wrapped by cardinality.
pub fn member_type(field: &Field) -> String {
    let element = element_type(&field.type_ref);
    match field.cardinality {
        Cardinality::Required => element,
        Cardinality::Optional => format!("std::optional<{}>", element),
        Cardinality::Repeated => format!("std::vector<{}>", element),
    }
}

fn generated_banner(ctx: &ArtifactContext) -> String {
    if ctx.source_filename.is_empty() {
        "// Generated by wiregen. Do not edit.\n".to_string()
    } else {
        format!("// Generated by wiregen from {}. Do not edit.\n", ctx.source_filename)
    }
}

fn user_includes(ctx: &ArtifactContext) -> String {
    let mut out = String::new();
    for inc in &ctx.includes {
        out += &format!("#include \"{}\"\n", inc);
    }
    out
}

fn open_namespace(ctx: &ArtifactContext) -> String {
    if ctx.namespace.is_empty() {
        String::new()
    } else {
        format!("namespace {} {{\n\n", ctx.namespace)
    }
}

fn close_namespace(ctx: &ArtifactContext) -> String {
    if ctx.namespace.is_empty() {
        String::new()
    } else {
        format!("}} // namespace {}\n", ctx.namespace)
    }
}

// ==================== Message interface ====================

fn header_prologue(ctx: &ArtifactContext) -> String {
    let mut out = generated_banner(ctx);
    out += "#pragma once\n\n";
    out += "#include <cstdint>\n#include <optional>\n#include <string>\n#include <type_traits>\n#include <vector>\n";
    if !ctx.includes.is_empty() {
        out += "\n";
        out += &user_includes(ctx);
    }
    out += "\n";
    out += &open_namespace(ctx);
    out
}

fn header_aliases(aliases: &AliasMap, repeats: &RepeatAliasMap) -> String {
    let mut out = String::from("// Type aliases\n");
    for e in aliases.iter() {
        match repeats.uses(&e.name) {
            Some(n) => out += &format!("using {} = {}; // shared by {} fields\n", e.name, e.declaration, n),
            None => out += &format!("using {} = {};\n", e.name, e.declaration),
        }
    }
    out += "\n";
    out
}

fn header_enums(messages: &[&MessageSpec]) -> String {
    let mut out = format!("enum class {} : std::uint64_t\n{{\n", MESSAGE_TYPE_ENUM);
    for m in messages {
        out += &format!("    k{} = {:#x},\n", m.name, m.id);
    }
    out += "};\n\n";
    out
}

fn header_struct(message: &MessageSpec, discards: &DiscardSet) -> String {
    let mut out = format!("struct {}\n{{\n", message.name);
    out += &format!(
        "    static constexpr {} kType = {}::k{};\n",
        MESSAGE_TYPE_ENUM, MESSAGE_TYPE_ENUM, message.name
    );
    let declared: Vec<_> = discards.declared_fields(message).collect();
    if !declared.is_empty() {
        out += "\n";
    }
    for (f, discarded) in declared {
        let member = format!("    {} {};", member_type(f), member_name(&f.name));
        if discarded {
            out += &format!("{} // discarded: not encoded\n", member);
        } else {
            out += &member;
            out += "\n";
        }
    }
    out += "};\n\n";
    out += &format!("Bytes& operator<<(Bytes& buffer, const {}& msg);\n", message.name);
    out += &format!("BytesSpan operator>>(BytesSpan buffer, {}& msg);\n\n", message.name);
    out
}

fn header_epilogue(ctx: &ArtifactContext, aliases: &AliasMap) -> String {
    let mut out = String::new();
    for e in aliases.iter() {
        out += &format!("static_assert(std::is_default_constructible_v<{}>);\n", e.name);
    }
    if !aliases.is_empty() {
        out += "\n";
    }
    out += &close_namespace(ctx);
    out
}

// ==================== Message implementation ====================

fn source_prologue(ctx: &ArtifactContext) -> String {
    let mut out = generated_banner(ctx);
    out += &user_includes(ctx);
    out += "\n";
    out += &open_namespace(ctx);
    out
}

fn source_aliases(aliases: &AliasMap, repeats: &RepeatAliasMap) -> String {
    let mut out = String::from("//\n// Aliases\n//\n");
    for e in aliases.iter() {
        match repeats.uses(&e.name) {
            Some(n) => out += &format!("// {} = {} (shared by {} fields)\n", e.name, e.declaration, n),
            None => out += &format!("// {} = {}\n", e.name, e.declaration),
        }
    }
    out += "\n";
    out
}

fn encode_line(field: &Field) -> String {
    let member = member_name(&field.name);
    if field.primitive() == Some(PrimitiveType::Varint) {
        format!("    buffer << AsUintVar(msg.{});\n", member)
    } else {
        format!("    buffer << msg.{};\n", member)
    }
}

fn decode_line(field: &Field) -> String {
    let member = member_name(&field.name);
    if field.primitive() == Some(PrimitiveType::Varint) {
        format!("    buffer = buffer >> AsUintVar(msg.{});\n", member)
    } else {
        format!("    buffer = buffer >> msg.{};\n", member)
    }
}

fn source_codec(message: &MessageSpec, discards: &DiscardSet) -> String {
    let name = &message.name;
    let encoded: Vec<&Field> = discards.encoded_fields(message).collect();

    let mut out = format!("//\n// {}\n//\n\n", name);
    out += &format!("Bytes& operator<<(Bytes& buffer, const {}& msg)\n{{\n", name);
    out += &format!(
        "    buffer << AsUintVar(static_cast<std::uint64_t>({}::kType));\n",
        name
    );
    for f in &encoded {
        out += &encode_line(f);
    }
    out += "    return buffer;\n}\n\n";

    if encoded.is_empty() {
        out += &format!(
            "BytesSpan operator>>(BytesSpan buffer, [[maybe_unused]] {}& msg)\n{{\n",
            name
        );
    } else {
        out += &format!("BytesSpan operator>>(BytesSpan buffer, {}& msg)\n{{\n", name);
    }
    for f in &encoded {
        out += &decode_line(f);
    }
    out += "    return buffer;\n}\n\n";
    out
}

fn source_epilogue(ctx: &ArtifactContext, _aliases: &AliasMap) -> String {
    close_namespace(ctx)
}

// ==================== Transport ====================

fn transport_header_prologue(ctx: &ArtifactContext) -> String {
    let mut out = generated_banner(ctx);
    out += "#pragma once\n\n";
    if !ctx.includes.is_empty() {
        out += &user_includes(ctx);
        out += "\n";
    }
    out += &open_namespace(ctx);
    out += &format!("class {}\n{{\n  public:\n", TRANSPORT_CLASS);
    out += &format!("    virtual ~{}() = default;\n\n", TRANSPORT_CLASS);
    out += "    virtual void SendControlMessage(BytesSpan payload) = 0;\n\n";
    out
}

fn transport_header_methods(message: &MessageSpec, _discards: &DiscardSet) -> String {
    let name = &message.name;
    let mut out = format!("    void Send{}(const {}& msg);\n", name, name);
    out += &format!("    bool Handle{}(BytesSpan payload);\n", name);
    out += &format!(
        "    virtual bool On{}([[maybe_unused]] const {}& msg) {{ return false; }}\n\n",
        name, name
    );
    out
}

fn transport_header_epilogue(ctx: &ArtifactContext, _aliases: &AliasMap) -> String {
    let mut out = String::from("};\n\n");
    out += &close_namespace(ctx);
    out
}

fn transport_source_methods(message: &MessageSpec, _discards: &DiscardSet) -> String {
    let name = &message.name;
    let mut out = format!(
        "void {}::Send{}(const {}& msg)\n{{\n",
        TRANSPORT_CLASS, name, name
    );
    out += "    Bytes buffer;\n    buffer << msg;\n    SendControlMessage(buffer);\n}\n\n";
    out += &format!(
        "bool {}::Handle{}(BytesSpan payload)\n{{\n",
        TRANSPORT_CLASS, name
    );
    out += &format!("    {} msg;\n    payload >> msg;\n    return On{}(msg);\n}}\n\n", name, name);
    out
}
