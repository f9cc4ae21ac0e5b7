/// Analysis layer: method catalog, request assembly, transport, result binding.
///
/// Architecture:
/// ```text
///   Selection + SourceFile
///        │
///        ▼
///   ┌──────────┐
///   │  request  │  method dispatch table → multipart fields + endpoint
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  client   │  POST {service}/correlation | {service}/ewma
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  result   │  imageUrl + captured method → AnalysisResult
///   └──────────┘
/// ```

pub mod client;
pub mod method;
pub mod request;
pub mod result;
