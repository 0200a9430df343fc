//! Fixed phrases and the keys and addresses they derive to.

pub const FIRST_PHRASE: &str = "act actor across account ability about above action about about actor able actor abuse across act acquire absent access abstract act able acquire about";
pub const FIRST_SECRET_HEX: &str = "e71155ef6dfd40ca66be0b6aac44b09b1effd60eb2a92c8dfedd1d77cceeb254";
pub const FIRST_PUBLIC_HEX: &str = "cca1359ba28c5dba3e44630d6ad35139a3edf9c8b15f96b2456a61e6d521dc18";

/// (version, workchain, friendly address, state init hash)
pub const FIRST_ADDRESSES: &[(&str, i32, &str, &str)] = &[
    ("v3r1", 0, "EQAtwKxvJRT0KJusA9afkbP3hVWxWNNX_MqXkSzYfGcw0wuq", "2dc0ac6f2514f4289bac03d69f91b3f78555b158d357fcca97912cd87c6730d3"),
    ("v3r1", -1, "Ef8kAJAeCmB43I_vmy-F9c2WRaVyq2B0pGPHfpVHO9ICoISD", "2400901e0a6078dc8fef9b2f85f5cd9645a572ab6074a463c77e95473bd202a0"),
    ("v3r2", 0, "EQCO5mBeWq7FYEAAwVdjXhdOjUSldvVe95ZpI_TbtjOrVYMf", "8ee6605e5aaec5604000c157635e174e8d44a576f55ef7966923f4dbb633ab55"),
    ("v3r2", -1, "Ef8thLF068vfY1uuD2ERyQKhKuc2pQF2wHd9itVRzjrEi8L_", "2d84b174ebcbdf635bae0f6111c902a12ae736a50176c0777d8ad551ce3ac48b"),
    ("v4r2", 0, "EQD-Knd3U-NeP3H5Xd1SI-ZY8lT8RsLqF9RW3wcvuncROHTN", "fe2a777753e35e3f71f95ddd5223e658f254fc46c2ea17d456df072fba771138"),
    ("v4r2", -1, "Ef9kzRQ2wT3dPr2u98keJAXA_CSkF6crvovO0upbj4AHMoBw", "64cd1436c13ddd3ebdaef7c91e2405c0fc24a417a72bbe8bced2ea5b8f800732"),
];

/// Non-bounceable, test-only form of the v4r2 workchain 0 address above.
pub const FIRST_V4R2_TESTNET_NON_BOUNCEABLE: &str = "0QD-Knd3U-NeP3H5Xd1SI-ZY8lT8RsLqF9RW3wcvuncROJKC";

pub const SECOND_PHRASE: &str = "abandon achieve absent across absurd absent absorb acoustic acquire accuse acoustic absurd absent above achieve able achieve actual account across absent abandon account about";
pub const SECOND_SECRET_HEX: &str = "198c406168feebfddc3ca2f804caf3225242a55fb74f3fd92514826a5804981d";
pub const SECOND_PUBLIC_HEX: &str = "bc1207aded6c721bfd1816f30cd79400edc263a25b9d3bda87397b9a42f30f40";
pub const SECOND_V4R2_ADDRESS: &str = "EQA4Ri2cmCdV0EuOLWQQuKpyRt0bAItAeTa0ORoZx8f3LxQL";
