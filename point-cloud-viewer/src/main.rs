mod engine;

use engine::core::app_setup::create_app;
use engine::core::config::ViewerConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(target_arch = "wasm32"))]
    let config = ViewerConfig::from_args()?;

    #[cfg(target_arch = "wasm32")]
    let config = ViewerConfig::default();

    let mut app = create_app(config);

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }

    Ok(())
}
