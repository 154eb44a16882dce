use clap::Parser;
use ens_admin::args::EnsAdmin;
use ens_admin_common::{handler, utils};

fn main() -> eyre::Result<()> {
    handler::install();
    utils::load_dotenv();
    utils::subscriber();
    let args = EnsAdmin::parse();
    run(args)
}

#[tokio::main]
async fn run(args: EnsAdmin) -> eyre::Result<()> {
    args.run().await
}
