use colored::Colorize;
use keycard_provider::KeycardProvider;

pub fn handle() {
    let provider = KeycardProvider::new();

    println!("{}", "Resources:".bold());
    for type_name in provider.resource_types() {
        println!("  • {}", type_name.cyan());
    }

    println!();
    println!("{}", "Data sources:".bold());
    for type_name in provider.data_source_types() {
        println!("  • {}", type_name.cyan());
    }
}
