//! Example: delegating clicks on a small document
//!
//! Run with `RUST_LOG=fos_delegator=trace,fos_dom=debug` to watch the walk.

use fos_delegator::{Delegator, DelegatorConfig, EventKey, Handler};
use fos_dom::{Document, Event};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    
    let mut doc = Document::new();
    let body = doc.body();
    let list = doc.append_element(body, "ul")?;
    let item = doc.append_element(list, "li")?;
    let link = doc.append_element(item, "a")?;
    
    let delegator = Delegator::for_document(&mut doc, &DelegatorConfig::default())?;
    
    delegator.add_global_event_listener("click", Handler::from_fn(|ev| {
        println!("global: click on {:?}", ev.target);
        Ok(())
    }));
    delegator.add_event_listener(item, "click", Handler::from_fn(|ev| {
        println!("item: handled at {:?}, stopping", ev.current_target());
        ev.stop_bubbling();
        Ok(())
    }));
    delegator.add_event_listener(list, EventKey::Any, Handler::from_fn(|ev| {
        println!("list: saw {}", ev.event_type);
        Ok(())
    }));
    
    // item stops bubbling, so the list never sees this click
    doc.tree().dispatch_event(&mut Event::mouse("click", link, 12.0, 8.0))?;
    // nothing on item for keydown; the catch-all on list answers
    doc.tree().dispatch_event(&mut Event::key("keydown", link, "Enter"))?;
    
    Ok(())
}
