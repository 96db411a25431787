use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    masquerade::cli::main()
}
