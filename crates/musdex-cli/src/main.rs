//! musdex: extract archives into version-controlled trees
//!
//! Without a command, extracts every managed archive that changed.

use musdex_cli::DefaultCommand;

fn main() {
    musdex_cli::main(DefaultCommand::Extract);
}
