//! LoadingViewController: a busy indicator.

use std::any::Any;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::context::Ui;
use crate::controller::{Controller, ViewController};
use crate::error::Result;
use crate::view::View;

const SEGMENTS: usize = 12;

/// Shows a segmented animation while something is in flight.
///
/// The animation is built in `init` and starts stopped.
pub struct LoadingViewController {
    base: ViewController,
}

impl LoadingViewController {
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("loading-view-controller");
        ViewController::build(ui, &all, |base, _| Self { base })
    }

    pub fn play(&self) {
        self.base.view().set_visible(true);
    }

    pub fn stop(&self) {
        self.base.view().set_visible(false);
    }

    pub fn is_playing(&self) -> bool {
        self.base.view().is_visible()
    }
}

impl Controller for LoadingViewController {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn init(&self) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let ui = self.base.ui();
            let animation = View::new(ui, &["animation-view"]);
            for segment in 1..=SEGMENTS {
                animation.append_child(&View::new(ui, &[segment.to_string().as_str()]));
            }
            self.base.view().append_child(&animation);
            self.stop();

            self.base.init().await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;

    #[tokio::test]
    async fn init_builds_stopped_animation() {
        let ui = Ui::new(AppConfig::default());
        let loading = LoadingViewController::new(&ui, &[]);
        assert!(loading.is_playing());

        loading.init().await.unwrap();
        let animation = loading.base().view().children_with_class("animation-view");
        assert_eq!(animation.len(), 1);
        assert_eq!(animation[0].child_count(), 12);
        assert!(animation[0].child(11).unwrap().has_class("12"));
        assert!(!loading.is_playing());

        loading.play();
        assert!(loading.is_playing());
        loading.stop();
        assert!(!loading.is_playing());
    }
}
