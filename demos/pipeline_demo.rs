//! Minimal end-to-end usage of the pipeline: define a schema, register a
//! deserialization handle per node type, and run a source string through
//! `process`.

use hxl_lang::{process, DataType, DeserializationProtocol, Schema, SchemaNodeProperty, SchemaNodeType};

const SOURCE: &str = "\
<Cube> Origin
\tsize: 1
\tlabel: \"origin cube\"
<Cube> Offset <= Origin
\tsize: 2
";

fn main() {
    let schema = Schema::new(vec![SchemaNodeType::new("Cube")
        .property(SchemaNodeProperty::new("size", DataType::Int).required())
        .property(SchemaNodeProperty::new("label", DataType::String))]);

    let protocol = DeserializationProtocol::new().on("Cube", |node| {
        println!("Cube {:?}: {:?}", node.name, node.properties);
    });

    let result = process(SOURCE, &schema, &protocol);

    if !result.is_ok() {
        for error in &result.errors {
            eprintln!("error {}: {}", error.code.code(), error.message);
        }
        std::process::exit(1);
    }

    println!("total time: {:?}", result.performance.total());
}
