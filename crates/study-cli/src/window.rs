use study_core::config::WindowConfig;

/// How the frontend was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// A native window was shown and the user has closed it.
    #[cfg_attr(not(feature = "native-window"), allow(dead_code))]
    Closed,
    /// The page was handed to the system browser; there is no window to
    /// wait on.
    Detached,
}

/// Show `url` in a native webview window titled from `config`. Blocks the
/// calling thread, which must be the main thread, until the window closes.
#[cfg(feature = "native-window")]
pub fn show(config: &WindowConfig, url: &str) -> anyhow::Result<Shell> {
    use tao::dpi::LogicalSize;
    use tao::event::{Event, WindowEvent};
    use tao::event_loop::{ControlFlow, EventLoop};
    use tao::platform::run_return::EventLoopExtRunReturn;
    use tao::window::WindowBuilder;
    use wry::WebViewBuilder;

    let mut event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(1100.0, 800.0))
        .build(&event_loop)?;

    let builder = WebViewBuilder::new()
        .with_url(url)
        .with_devtools(config.debug);

    #[cfg(not(target_os = "linux"))]
    let _webview = builder.build(&window)?;
    #[cfg(target_os = "linux")]
    let _webview = {
        use anyhow::Context;
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .context("window has no GTK container for the webview")?;
        builder.build_gtk(vbox)?
    };

    tracing::info!(url, title = %config.title, "window open");
    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        if let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } = event
        {
            *control_flow = ControlFlow::Exit;
        }
    });
    tracing::info!("window closed");
    Ok(Shell::Closed)
}

/// Without the `native-window` feature the page opens in the system browser.
#[cfg(not(feature = "native-window"))]
pub fn show(config: &WindowConfig, url: &str) -> anyhow::Result<Shell> {
    tracing::debug!(title = %config.title, "native window disabled; using the system browser");
    open::that(url)?;
    Ok(Shell::Detached)
}
