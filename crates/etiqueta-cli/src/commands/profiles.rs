use etiqueta_core::error::EtiquetaError;
use etiqueta_core::profiles::{builtin, load_profile};
use std::path::Path;

use crate::output;

pub fn list() -> Result<(), EtiquetaError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let p = builtin::load_preset(name)?;
        let gate = match p.destination.as_deref() {
            Some(d) => format!(" [DESTINO = {d}]"),
            None => String::new(),
        };
        println!("  {:<14} {} (v{}, {}){}", name, p.name, p.version, p.kind, gate);
        if let Some(ref desc) = p.description {
            println!("                 {desc}");
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), EtiquetaError> {
    let p = builtin::load_preset(preset)?;
    output::json::print(&p)
}

pub fn validate(file: &Path) -> Result<(), EtiquetaError> {
    let p = load_profile(file)?;
    let markets: Vec<String> = p.markets.iter().map(|m| m.to_string()).collect();
    println!("Valid profile: {} (v{})", p.name, p.version);
    println!("  kind:           {}", p.kind);
    println!(
        "  destination:    {}",
        p.destination.as_deref().unwrap_or("(all rows)")
    );
    println!("  line tolerance: {}", p.line_tolerance());
    if !markets.is_empty() {
        println!("  markets:        {}", markets.join(", "));
    }
    Ok(())
}
