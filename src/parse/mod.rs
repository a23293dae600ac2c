pub mod mpcdi_xml;
