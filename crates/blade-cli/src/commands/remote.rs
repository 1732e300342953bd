use std::sync::Arc;

use blade_broker::{HttpRemote, MessageBroker};
use blade_config::BladeConfig;
use blade_core::BladeMsg;

fn connect(config: &BladeConfig) -> blade_core::Result<MessageBroker> {
    let remote = HttpRemote::from_config(&config.remote)?;
    Ok(MessageBroker::new(config.blade.name.clone(), Arc::new(remote)))
}

fn show(label: &str, msg: Option<&BladeMsg>) {
    match msg {
        Some(m) => println!("{label:<10} {}", m.text()),
        None => println!("{label:<10} (none)"),
    }
}

pub(super) async fn cmd_poll(config: BladeConfig) -> blade_core::Result<()> {
    let broker = connect(&config)?;
    let state = broker.refresh().await;
    broker.close();
    let state = state?;

    println!("Blade: {}", broker.identity());
    show("Request:", state.request.as_ref());
    show("Response:", state.response.as_ref());
    Ok(())
}

pub(super) async fn cmd_send(config: BladeConfig, text: &str) -> blade_core::Result<()> {
    let broker = connect(&config)?;
    // The pending-response guard needs a fresh view first
    broker.refresh().await?;

    let sent = broker.send_response(text).await;
    broker.close();

    if sent {
        println!("Sent as {}: {text}", broker.identity());
    } else if let Some(pending) = broker.current_response() {
        println!("Not sent: a response is still pending ({})", pending.text());
    } else {
        println!("Not sent: the coordination service rejected the response");
    }
    Ok(())
}
