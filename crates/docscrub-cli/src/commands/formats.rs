use anyhow::Result;
use docscrub_core::DocumentFormat;

pub fn handle() -> Result<()> {
    println!("Supported formats:");
    for format in DocumentFormat::ALL {
        println!("  .{:<6} {}", format.extension(), format.content_type());
    }
    Ok(())
}
