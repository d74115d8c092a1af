// Terminal front end for the lifecycle demo.
//
// Commands: `i` increments the counter, `t` toggles the component, `q` quits.

use lifecycle_log::prelude::*;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut host = Host::new(HostConfig::default(), TracingSink);
    host.try_settle()?;
    println!("{}", host.view()?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line?.as_deref().map(str::trim) {
                    None | Some("q") => break,
                    Some("i") => host.increment()?,
                    Some("t") => host.toggle()?,
                    Some(other) => {
                        eprintln!("unknown command `{other}` (i: increment, t: toggle, q: quit)");
                        continue;
                    }
                }
                host.try_settle()?;
            }
            result = host.settle() => result?,
        }

        println!("{}", host.view()?);
    }

    Ok(())
}
