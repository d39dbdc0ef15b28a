include!(concat!(env!("OUT_DIR"), "/blobs.rs"));

fn main() {
    let original_content = "Contents of file.txt\n";

    // The generated static decompresses on first access.
    let data: &[u8] = &blobs::FILE_TXT;

    let s = std::str::from_utf8(data).expect("data is not valid UTF-8");
    println!("{s}");

    assert_eq!(s, original_content);
    assert_eq!(data, original_content.as_bytes());

    println!("Decompressed data matches original.");
}
