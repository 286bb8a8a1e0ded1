pub mod asset;

pub use asset::{
    AssetCategory, FileAssetDescriptor, FileClass, ImageAssetDescriptor, ImageCategory,
    UploadFile,
};
