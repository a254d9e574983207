fn main() -> anyhow::Result<()> {
    crd_typegen::cli::run_cli()
}
