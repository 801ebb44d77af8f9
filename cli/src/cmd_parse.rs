//! `logproof parse`: show how an event declaration is read.

use anyhow::Result;
use logproof_evm::{parse_event_declaration, topic0, tuple_type_string, LogDecoder};

pub fn run(declaration: &str, as_json: bool) -> Result<()> {
    let sig = parse_event_declaration(declaration)?;
    let canonical = sig.canonical();
    let topic = topic0(&canonical);
    let tuple = tuple_type_string(&sig.type_info());

    if as_json {
        let out = serde_json::json!({
            "name": sig.name,
            "signature": canonical,
            "topic0": topic,
            "tupleType": tuple,
            "params": sig.params,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Event:     {}", sig.name);
    println!("Signature: {canonical}");
    println!("Topic0:    {topic}");
    println!("Encoded as {tuple}");
    println!("Params:    {}", sig.params.len());
    for (i, p) in sig.params.iter().enumerate() {
        let name = if p.name.is_empty() { "<unnamed>" } else { p.name.as_str() };
        let location = if p.indexed { "topic" } else { "data" };
        println!("  [{i}] {name}: {} ({location})", p.ty);
    }

    // Type names are only checked when the decoder resolves them.
    if let Err(e) = LogDecoder::new(sig) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
    Ok(())
}
