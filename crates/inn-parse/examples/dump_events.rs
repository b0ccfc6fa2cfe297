use std::io::Read;

use inn_parse::{Event, Parser};

fn main() {
    let mut source = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut source) {
        eprintln!("failed to read stdin: {e}");
        std::process::exit(1);
    }

    let mut events: Vec<Event> = Vec::new();
    match Parser::new(&source).parse(&mut events) {
        Ok(()) => {
            for event in events {
                println!("{event:?}");
            }
        }
        Err(e) => {
            for event in events {
                println!("{event:?}");
            }
            eprint!("{}", e.render("<stdin>", &source));
            std::process::exit(1);
        }
    }
}
