//! Integration tests: schema → aliases → four artifacts, with the built-in C++
//! templates and with a tracing template set that makes section order visible.

use wiregen::{
    cpp, generate, parse, ArtifactContext, ArtifactKind, Artifacts, Compiler, DiscardMode,
    DiscardSet, ErrorClass, Field, GenError, GenerationPlan, GeneratorConfig, MessageSpec,
    RepeatAliasMap, Schema, Section, Template, TemplateSet, TypeDecl,
};
use wiregen::alias::AliasMap;

const EXAMPLE: &str = r#"
type TrackId = "quicr::Bytes";

message Subscribe = 2 {
  track: TrackId;
}

message Announce = 1 {
  namespace: TrackId;
  reserved: u8;
}
"#;

fn ctx(kind: ArtifactKind) -> ArtifactContext {
    ArtifactContext {
        source_filename: "example.wire".to_string(),
        namespace: "wire::messages".to_string(),
        includes: vec![format!("{}.h", kind)],
    }
}

fn run(schema: &Schema, templates: &TemplateSet, discards: &DiscardSet) -> Result<Artifacts, GenError> {
    generate(schema, templates, discards, &|kind: ArtifactKind| ctx(kind))
}

fn cpp_run(src: &str, discards: &DiscardSet) -> Artifacts {
    let schema = parse(src).expect("parse");
    let templates = cpp::template_set().expect("templates");
    run(&schema, &templates, discards).expect("generate")
}

// ==================== Tracing templates ====================

fn t_prologue(_: &ArtifactContext) -> String {
    "BEGIN\n".to_string()
}

fn t_aliases(aliases: &AliasMap, repeats: &RepeatAliasMap) -> String {
    aliases
        .iter()
        .map(|e| format!("ALIAS {} repeated={}\n", e.name, repeats.contains(&e.name)))
        .collect()
}

fn t_enums(messages: &[&MessageSpec]) -> String {
    messages.iter().map(|m| format!("ENUM {} {}\n", m.name, m.id)).collect()
}

fn t_message(message: &MessageSpec, discards: &DiscardSet) -> String {
    let fields: Vec<_> = discards.declared_fields(message).map(|(f, _)| f.name.as_str()).collect();
    format!("MSG {} [{}]\n", message.name, fields.join(","))
}

fn t_codec(message: &MessageSpec, discards: &DiscardSet) -> String {
    let fields: Vec<_> = discards.encoded_fields(message).map(|f| f.name.as_str()).collect();
    format!("CODEC {} [{}]\n", message.name, fields.join(","))
}

fn t_epilogue(_: &ArtifactContext, aliases: &AliasMap) -> String {
    format!("END aliases={}\n", aliases.len())
}

fn tracing_set() -> TemplateSet {
    let mut set = TemplateSet::new();
    for kind in ArtifactKind::ALL {
        for &section in kind.sections() {
            let template = match section {
                Section::Prologue => Template::Prologue(t_prologue),
                Section::Aliases => Template::Aliases(t_aliases),
                Section::Enums => Template::Enums(t_enums),
                Section::Message => Template::PerMessage(t_message),
                Section::Codec => Template::PerMessage(t_codec),
                Section::Epilogue => Template::Epilogue(t_epilogue),
            };
            set.insert(kind.key(section), template).expect("insert");
        }
    }
    set
}

fn lines_with<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
    text.lines().filter(|l| l.starts_with(prefix)).collect()
}

fn names_after(text: &str, prefix: &str) -> Vec<String> {
    lines_with(text, prefix)
        .iter()
        .map(|l| l[prefix.len()..].split_whitespace().next().unwrap_or("").to_string())
        .collect()
}

// ==================== Example scenarios ====================

#[test]
fn example_schema_with_tracing_templates() {
    let schema = parse(EXAMPLE).expect("parse");
    let discards = DiscardSet::from_names(["reserved"], DiscardMode::Omit);
    let a = run(&schema, &tracing_set(), &discards).expect("generate");

    assert_eq!(
        a.message_interface,
        "BEGIN\n\
         ALIAS TrackId repeated=true\n\
         ENUM Announce 1\n\
         ENUM Subscribe 2\n\
         MSG Subscribe [track]\n\
         MSG Announce [namespace]\n\
         END aliases=1\n"
    );
    assert_eq!(
        a.message_implementation,
        "BEGIN\n\
         ALIAS TrackId repeated=true\n\
         CODEC Subscribe [track]\n\
         CODEC Announce [namespace]\n\
         END aliases=1\n"
    );
    assert_eq!(
        a.transport_interface,
        "BEGIN\nMSG Subscribe [track]\nMSG Announce [namespace]\nEND aliases=0\n"
    );
    assert_eq!(
        a.transport_implementation,
        "BEGIN\nCODEC Subscribe [track]\nCODEC Announce [namespace]\nEND aliases=0\n"
    );
}

#[test]
fn example_schema_with_cpp_templates() {
    let discards = DiscardSet::from_names(["reserved"], DiscardMode::Omit);
    let a = cpp_run(EXAMPLE, &discards);

    let header = &a.message_interface;
    assert_eq!(header.matches("using TrackId = ").count(), 1);
    assert!(header.contains("using TrackId = quicr::Bytes; // shared by 2 fields\n"));
    let announce_enum = header.find("    kAnnounce = 0x1,").expect("announce enum");
    let subscribe_enum = header.find("    kSubscribe = 0x2,").expect("subscribe enum");
    assert!(announce_enum < subscribe_enum);
    assert!(header.contains("    TrackId namespace_;\n"));
    assert!(!header.contains("reserved"));

    let source = &a.message_implementation;
    assert!(source.contains("buffer << msg.namespace_;"));
    assert!(!source.contains("reserved"));
    assert!(source.starts_with("// Generated by wiregen from example.wire. Do not edit.\n"));
    assert!(source.contains("#include \"message-implementation.h\"\n"));
    assert!(source.ends_with("} // namespace wire::messages\n"));
}

#[test]
fn empty_schema_renders_only_frame() {
    let schema = Schema::default();
    let a = run(&schema, &tracing_set(), &DiscardSet::default()).expect("generate");
    for kind in ArtifactKind::ALL {
        assert_eq!(a.get(kind), "BEGIN\nEND aliases=0\n", "{}", kind);
    }

    let templates = cpp::template_set().expect("templates");
    let a = run(&schema, &templates, &DiscardSet::default()).expect("generate");
    assert!(!a.message_interface.contains("enum class"));
    assert!(!a.message_interface.contains("using "));
    assert!(!a.message_interface.contains("struct "));
    assert!(!a.message_implementation.contains("Aliases"));
    assert!(a.transport_interface.contains("class Transport"));
    assert!(!a.transport_implementation.contains("Transport::"));
}

// ==================== Properties ====================

#[test]
fn generation_is_deterministic() {
    let src = include_str!("../schemas/moqt.wire");
    let discards = DiscardSet::from_names(["priority", "Subscribe.end_group"], DiscardMode::Declare);
    let first = cpp_run(src, &discards);
    let second = cpp_run(src, &discards);
    assert_eq!(first, second);
}

#[test]
fn interface_and_implementation_list_messages_in_same_order() {
    let a = cpp_run(include_str!("../schemas/moqt.wire"), &DiscardSet::default());

    let structs = names_after(&a.message_interface, "struct ");
    let codecs: Vec<String> = lines_with(&a.message_implementation, "Bytes& operator<<(Bytes& buffer, const ")
        .iter()
        .map(|l| {
            l.trim_start_matches("Bytes& operator<<(Bytes& buffer, const ")
                .trim_end_matches("& msg)")
                .to_string()
        })
        .collect();
    assert_eq!(structs.len(), 10);
    assert_eq!(structs, codecs);

    let sends: Vec<String> = lines_with(&a.transport_interface, "    void Send")
        .iter()
        .map(|l| l["    void Send".len()..].split('(').next().unwrap_or("").to_string())
        .collect();
    let bodies: Vec<String> = lines_with(&a.transport_implementation, "void Transport::Send")
        .iter()
        .map(|l| l["void Transport::Send".len()..].split('(').next().unwrap_or("").to_string())
        .collect();
    assert_eq!(sends, structs);
    assert_eq!(sends, bodies);
}

#[test]
fn per_message_blocks_follow_declaration_order() {
    let a = cpp_run(include_str!("../schemas/moqt.wire"), &DiscardSet::default());
    let structs = names_after(&a.message_interface, "struct ");
    assert_eq!(structs.first().map(String::as_str), Some("ClientSetup"));
    assert_eq!(structs.last().map(String::as_str), Some("GoAway"));
}

#[test]
fn enum_block_is_sorted_by_id() {
    let a = cpp_run(include_str!("../schemas/moqt.wire"), &DiscardSet::default());
    let ids: Vec<u64> = a
        .message_interface
        .lines()
        .filter(|l| l.starts_with("    k") && l.contains(" = 0x"))
        .map(|l| {
            let hex = l.split(" = 0x").nth(1).expect("value").trim_end_matches(',');
            u64::from_str_radix(hex, 16).expect("hex")
        })
        .collect();
    assert_eq!(ids.len(), 10);
    assert!(ids.windows(2).all(|w| w[0] <= w[1]), "{:?}", ids);
    assert_eq!(ids.first(), Some(&0x03));
    assert_eq!(ids.last(), Some(&0x41));
}

#[test]
fn discarded_fields_never_reach_codec_logic() {
    let src = include_str!("../schemas/moqt.wire");
    for mode in [DiscardMode::Omit, DiscardMode::Declare] {
        let discards = DiscardSet::from_names(["parameters", "request_id"], mode);
        let a = cpp_run(src, &discards);
        assert!(!a.message_implementation.contains("msg.parameters"));
        assert!(!a.message_implementation.contains("msg.request_id"));
        let declared = a.message_interface.contains("request_id;");
        assert_eq!(declared, mode == DiscardMode::Declare);
    }
}

#[test]
fn scoped_discard_touches_one_message() {
    let config = GeneratorConfig::from_toml_str(include_str!("../wiregen.toml")).expect("config");
    let schema = parse(include_str!("../schemas/moqt.wire")).expect("parse");
    let templates = cpp::template_set().expect("templates");
    let a = generate(&schema, &templates, &config.discard_set(), &|kind: ArtifactKind| {
        config.context_for(kind)
    })
    .expect("generate");

    let source = &a.message_implementation;
    let error_block = source
        .split("//\n// SubscribeError\n//")
        .nth(1)
        .and_then(|rest| rest.split("//\n// Announce\n//").next())
        .expect("SubscribeError block");
    assert!(!error_block.contains("track_alias"));
    assert!(error_block.contains("msg.reason_phrase"));
    assert!(source.contains("buffer << AsUintVar(msg.track_alias);"));
    assert!(a.message_interface.contains("namespace quicr::messages {"));
    assert!(a.transport_implementation.contains("#include \"ctrl_transport.h\""));
}

#[test]
fn aliases_declared_once_per_artifact() {
    let a = cpp_run(include_str!("../schemas/moqt.wire"), &DiscardSet::default());
    for name in ["TrackNamespace", "Parameter", "Location"] {
        assert_eq!(
            a.message_interface.matches(&format!("using {} = ", name)).count(),
            1,
            "{}",
            name
        );
    }
    assert!(a.message_interface.contains("using Parameter = quicr::Parameter; // shared by 5 fields\n"));
    assert!(!a.transport_interface.contains("using "));
    assert!(!a.transport_interface.contains("static_assert"));
}

#[test]
fn compile_order_does_not_matter() {
    let schema = parse(EXAMPLE).expect("parse");
    let templates = cpp::template_set().expect("templates");
    let discards = DiscardSet::default();
    let plan = GenerationPlan::build(&schema, &discards).expect("plan");
    let compiler = Compiler::new(&templates).expect("compiler");

    let source_first = compiler
        .compile(ArtifactKind::MessageImplementation, &plan, &ctx(ArtifactKind::MessageImplementation))
        .expect("source");
    let header = compiler
        .compile(ArtifactKind::MessageInterface, &plan, &ctx(ArtifactKind::MessageInterface))
        .expect("header");
    let source_again = compiler
        .compile(ArtifactKind::MessageImplementation, &plan, &ctx(ArtifactKind::MessageImplementation))
        .expect("source");

    assert_eq!(source_first, source_again);
    assert!(header.contains("kAnnounce"));
    let names: Vec<_> = plan.messages.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Subscribe", "Announce"]);
}

// ==================== Errors ====================

#[test]
fn missing_template_is_fatal_before_rendering() {
    let mut set = TemplateSet::new();
    for kind in ArtifactKind::ALL {
        for &section in kind.sections() {
            if kind == ArtifactKind::TransportImplementation && section == Section::Epilogue {
                continue;
            }
            let template = match section {
                Section::Prologue => Template::Prologue(t_prologue),
                Section::Aliases => Template::Aliases(t_aliases),
                Section::Enums => Template::Enums(t_enums),
                Section::Message | Section::Codec => Template::PerMessage(t_message),
                Section::Epilogue => Template::Epilogue(t_epilogue),
            };
            set.insert(kind.key(section), template).expect("insert");
        }
    }
    let schema = parse(EXAMPLE).expect("parse");
    let err = run(&schema, &set, &DiscardSet::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert_eq!(err.to_string(), "Template not found: transport:implementation:epilogue");
}

#[test]
fn unresolved_type_is_fatal() {
    let schema = Schema {
        types: vec![],
        messages: vec![MessageSpec::new(4, "Fetch", vec![Field::required("range", "Range")])],
    };
    let err = run(&schema, &tracing_set(), &DiscardSet::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert!(err.to_string().contains("Fetch.range"), "{}", err);
}

#[test]
fn duplicate_id_is_a_consistency_error() {
    let schema = Schema {
        types: vec![TypeDecl {
            name: "TrackId".to_string(),
            declaration: "quicr::Bytes".to_string(),
        }],
        messages: vec![
            MessageSpec::new(1, "Announce", vec![Field::required("ns", "TrackId")]),
            MessageSpec::new(1, "Unannounce", vec![Field::required("ns", "TrackId")]),
        ],
    };
    let err = run(&schema, &tracing_set(), &DiscardSet::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Consistency);
    assert!(matches!(err, GenError::DuplicateMessageId { id: 1, .. }));
}

#[test]
fn duplicate_message_name_is_a_consistency_error() {
    let schema = Schema {
        types: vec![],
        messages: vec![
            MessageSpec::new(1, "Announce", vec![Field::required("a", "u8")]),
            MessageSpec::new(2, "Announce", vec![]),
        ],
    };
    let templates = cpp::template_set().expect("templates");
    let err = run(&schema, &templates, &DiscardSet::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Consistency);
    assert!(matches!(err, GenError::DuplicateMessageName(ref n) if n == "Announce"));
}

#[test]
fn duplicate_field_is_a_consistency_error() {
    let schema = Schema {
        types: vec![],
        messages: vec![MessageSpec::new(
            1,
            "Announce",
            vec![Field::required("a", "u8"), Field::required("a", "u16")],
        )],
    };
    let templates = cpp::template_set().expect("templates");
    let err = run(&schema, &templates, &DiscardSet::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Consistency);
    assert!(matches!(err, GenError::DuplicateField { ref message, ref field } if message == "Announce" && field == "a"));
}

#[test]
fn duplicate_type_declaration_is_rejected() {
    let decl = TypeDecl {
        name: "TrackId".to_string(),
        declaration: "quicr::Bytes".to_string(),
    };
    let schema = Schema {
        types: vec![decl.clone(), decl],
        messages: vec![MessageSpec::new(1, "Announce", vec![Field::required("ns", "TrackId")])],
    };
    let err = run(&schema, &tracing_set(), &DiscardSet::default()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
    assert!(matches!(err, GenError::DuplicateType(ref n) if n == "TrackId"));
}
