use std::cell::Cell;
use std::fs;
use std::io::Cursor;
use std::rc::Rc;

use image::{ImageFormat, Rgba, RgbaImage};

use draw_heatmap::error::RetrievalError;
use draw_heatmap::logo_cache::{LogoCache, Transport};

struct CountingTransport {
    body: Vec<u8>,
    calls: Rc<Cell<usize>>,
}

impl Transport for CountingTransport {
    fn get(&self, _url: &str) -> Result<Vec<u8>, RetrievalError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.body.clone())
    }
}

fn png_bytes(color: [u8; 4]) -> Vec<u8> {
    let mut img = RgbaImage::new(2, 2);
    for px in img.pixels_mut() {
        *px = Rgba(color);
    }
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("png encodes");
    out
}

fn counting_cache(root: &std::path::Path) -> (LogoCache<CountingTransport>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let transport = CountingTransport {
        body: png_bytes([10, 20, 30, 255]),
        calls: Rc::clone(&calls),
    };
    (LogoCache::with_transport(root, transport), calls)
}

#[test]
fn first_resolve_fetches_once_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (cache, calls) = counting_cache(&dir.path().join("logos"));

    let img = cache.resolve("50051", false).expect("resolves");
    assert_eq!(calls.get(), 1);
    assert_eq!((img.width(), img.height()), (2, 2));
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);

    let path = cache.cache_path("50051");
    let on_disk = fs::read(&path).expect("cache file written");
    assert_eq!(on_disk, png_bytes([10, 20, 30, 255]));
}

#[test]
fn second_resolve_hits_cache_without_fetching() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (cache, calls) = counting_cache(&dir.path().join("logos"));

    cache.resolve("50051", false).expect("resolves");
    let img = cache.resolve("50051", false).expect("resolves from cache");
    assert_eq!(calls.get(), 1);
    assert_eq!(img.get_pixel(1, 1).0, [10, 20, 30, 255]);
}

#[test]
fn force_refresh_always_fetches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (cache, calls) = counting_cache(&dir.path().join("logos"));

    cache.resolve("50051", false).expect("resolves");
    cache.resolve("50051", true).expect("refreshes");
    assert_eq!(calls.get(), 2);
}

#[test]
fn distinct_ids_get_distinct_cache_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (cache, calls) = counting_cache(&dir.path().join("logos"));

    cache.resolve("50051", false).expect("resolves");
    cache.resolve("52280", false).expect("resolves");
    assert_eq!(calls.get(), 2);
    assert!(cache.cache_path("50051").exists());
    assert!(cache.cache_path("52280").exists());
}
