fn main() -> anyhow::Result<()> {
    restbind_cli::run()
}
