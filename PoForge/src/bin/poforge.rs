fn main() -> anyhow::Result<()> {
    poforge::cli::run_cli()
}
