use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.default_personality {
            Some(key) => println!("  default-personality: {key}"),
            None => println!("  default-personality: (unset)"),
        }
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset)"),
        }
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset)"),
        }
        match self.markdown_enabled() {
            true => println!("  markdown: on"),
            false => println!("  markdown: off"),
        }
        if self.personalities.is_empty() {
            println!("  personalities: (none defined)");
        } else {
            println!("  personalities:");
            for entry in &self.personalities {
                println!("    {} {}", entry.avatar, entry.id);
            }
        }
    }
}
