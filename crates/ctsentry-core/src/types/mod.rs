pub mod alert;
pub mod cert;
pub mod feature;
pub mod work_item;

pub use alert::{AlertRecord, CSV_HEADER};
pub use cert::{CertDate, LeafCert};
pub use feature::FeatureVector;
pub use work_item::WorkItem;
