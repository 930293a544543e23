// Wed Oct 14 2026 - Alex

fn main() -> anyhow::Result<()> {
    profile_converter::ui::cli::run()
}
