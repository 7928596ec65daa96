mod command;
mod logging;
mod model;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
