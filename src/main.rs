use std::error::Error;
use std::io::IsTerminal;

use colored::Colorize;
use url::Url;

use datebook::client::Client;
use datebook::menu;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let url = match std::env::args().nth(1) {
        Some(arg) => Url::parse(&arg)?,
        None => return Err("usage: datebook <server-url>".into()),
    };

    let stdin = std::io::stdin();
    let mask_password = stdin.is_terminal();
    let mut input = stdin.lock();

    menu::main_menu(&mut input, mask_password, |credentials| Client::new(url.clone(), credentials)).await
}
