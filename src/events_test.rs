use std::cell::RefCell;
use std::rc::Rc;

use uuid::Uuid;

use super::*;
use crate::config::EditorConfig;

fn recorder() -> (Rc<RefCell<Vec<LayerChange>>>, Box<dyn LayerObserver>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let observer = move |change: &LayerChange, _: &LayerModel| sink.borrow_mut().push(change.clone());
    (seen, Box::new(observer))
}

#[test]
fn notify_reaches_every_subscriber_in_order() {
    let model = LayerModel::new(&EditorConfig::default());
    let mut observers = Observers::new();
    let (first, a) = recorder();
    let (second, b) = recorder();
    observers.subscribe(a);
    observers.subscribe(b);

    observers.notify(&LayerChange::ProductChanged, &model);
    assert_eq!(first.borrow().as_slice(), &[LayerChange::ProductChanged]);
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn unsubscribe_stops_notifications() {
    let model = LayerModel::new(&EditorConfig::default());
    let mut observers = Observers::new();
    let (seen, observer) = recorder();
    let id = observers.subscribe(observer);
    assert!(observers.unsubscribe(id));
    assert!(!observers.unsubscribe(id));
    assert!(observers.is_empty());

    observers.notify(&LayerChange::Restored, &model);
    assert!(seen.borrow().is_empty());
}

#[test]
fn layer_id_of_changes() {
    let id = Uuid::new_v4();
    assert_eq!(LayerChange::Created { id }.layer_id(), Some(id));
    assert_eq!(LayerChange::ActiveChanged { id: None }.layer_id(), None);
    assert_eq!(LayerChange::ProductChanged.layer_id(), None);
}

#[test]
fn geometry_changes_only_matter_for_the_active_layer() {
    let active = Uuid::new_v4();
    let other = Uuid::new_v4();
    assert!(LayerChange::TransformChanged { id: active }.affects_geometry_of(Some(active)));
    assert!(!LayerChange::TransformChanged { id: other }.affects_geometry_of(Some(active)));
    assert!(LayerChange::ActiveChanged { id: None }.affects_geometry_of(Some(active)));
    assert!(!LayerChange::StyleChanged { id: active }.affects_geometry_of(Some(active)));
}

#[test]
fn change_serializes_with_type_tag() {
    let json = serde_json::to_value(LayerChange::ProductChanged).unwrap_or_default();
    assert_eq!(json["type"], "product_changed");
}
