#[cfg(target_arch = "wasm32")]
fn main() {
    siakad_frontend::boot();
}

// The bin target only exists for trunk's wasm build.
#[cfg(not(target_arch = "wasm32"))]
fn main() {}
