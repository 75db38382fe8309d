use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::assets::{AssetCallback, AssetLoader};

/// Loads marker images through `<img>` elements, resolving once decoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageLoader;

impl AssetLoader for ImageLoader {
    type Image = HtmlImageElement;

    fn load(&self, src: &'static str, done: AssetCallback<HtmlImageElement>) {
        wasm_bindgen_futures::spawn_local(async move {
            let Ok(image) = HtmlImageElement::new() else {
                done(Err("failed to create image element".to_string()));
                return;
            };
            image.set_src(src);
            match JsFuture::from(image.decode()).await {
                Ok(_) => done(Ok(image)),
                Err(err) => done(Err(format!("{err:?}"))),
            }
        });
    }
}
