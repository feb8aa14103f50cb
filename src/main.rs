fn main() -> anyhow::Result<()> {
    swiper::run()?;
    Ok(())
}
