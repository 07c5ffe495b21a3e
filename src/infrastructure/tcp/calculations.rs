// Field table of the calculations block (command 3004), one entry per word
use super::datatype::{Datatype, Field};
use Datatype::*;

const HEAT_PUMP_CODES: &[&str] = &[
    "ERC",
    "SW1",
    "SW2",
    "WW1",
    "WW2",
    "L1I",
    "L2I",
    "L1A",
    "L2A",
    "KSW",
    "KLW",
    "SWC",
    "LWC",
    "L2G",
    "WZS",
    "L1I407",
    "L2I407",
    "L1A407",
    "L2A407",
    "L2G407",
    "LWC407",
    "L1AREV",
    "L2AREV",
    "WWC1",
    "WWC2",
    "L2G404",
    "WZW",
    "L1S",
    "L1H",
    "L2H",
    "WZWD",
    "ERC",
    "ERC",
    "ERC",
    "ERC",
    "ERC",
    "ERC",
    "ERC",
    "ERC",
    "ERC",
    "WWB_20",
    "LD5",
    "LD7",
    "SW 37_45",
    "SW 58_69",
    "SW 29_56",
    "LD5 (230V)",
    "LD7 (230 V)",
    "LD9",
    "LD5 REV",
    "LD7 REV",
    "LD5 REV 230V",
    "LD7 REV 230V",
    "LD9 REV 230V",
    "SW 291",
    "LW SEC",
    "HMD 2",
    "MSW 4",
    "MSW 6",
    "MSW 8",
    "MSW 10",
    "MSW 12",
    "MSW 14",
    "MSW 17",
    "MSW 19",
    "MSW 23",
    "MSW 26",
    "MSW 30",
    "MSW 4S",
    "MSW 6S",
    "MSW 8S",
    "MSW 10S",
    "MSW 12S",
    "MSW 16S",
    "MSW2-6S",
    "MSW4-16",
    "LD2AG",
    "LD9V",
    "MSW3-12",
    "MSW3-12S",
    "MSW2-9S",
    "LW 8",
    "LW 12",
    "HZ_HMD",
    "LW V4",
    "LW SEC 2",
    "MSW1-4S",
    "LP5V",
    "LP8V",
];

const BIVALENCE_LEVELS: &[&str] = &[
    "one compressor allowed to run",
    "two compressors allowed to run",
    "additional heat generator allowed to run",
];

const OPERATION_MODES: &[&str] = &[
    "heating",
    "hot water",
    "swimming pool/solar",
    "evu",
    "defrost",
    "no request",
    "heating external source",
    "cooling",
];

const SWITCH_OFF_REASONS: &[&str] = &[
    "heatpump error",
    "system error",
    "evu lock",
    "operation mode second heat generator",
    "air defrost",
    "maximal usage temperature",
    "minimal usage temperature",
    "lower usage limit",
    "no request",
    "flow rate",
    "PV max",
];

const STATUS_LINE_1: &[&str] = &[
    "heatpump running",
    "heatpump idle",
    "heatpump coming",
    "errorcode slot 0",
    "defrost",
    "waiting on LIN connection",
    "compressor heating up",
    "pump forerun",
];

const STATUS_LINE_2: &[&str] = &[
    "since",
    "in",
];

const STATUS_LINE_3: &[&str] = &[
    "heating",
    "no request",
    "grid switch on delay",
    "cycle lock",
    "lock time",
    "domestic water",
    "info bake out program",
    "defrost",
    "pump forerun",
    "thermal desinfection",
    "cooling",
    "swimming pool/solar",
    "heating external energy source",
    "domestic water external energy source",
    "flow monitoring",
    "second heat generator 1 active",
];

const SEC_OPERATION_MODES: &[&str] = &[
    "off",
    "cooling",
    "heating",
    "fault",
    "transition",
    "defrost",
    "waiting",
    "waiting",
    "transition",
    "stop",
    "manual",
    "simulation start",
    "evu lock",
];

pub static CALCULATIONS: &[Field] = &[
    Field::new("Unknown_Calculation_0", Integer("")),
    Field::new("Unknown_Calculation_1", Integer("")),
    Field::new("Unknown_Calculation_2", Integer("")),
    Field::new("Unknown_Calculation_3", Integer("")),
    Field::new("Unknown_Calculation_4", Integer("")),
    Field::new("Unknown_Calculation_5", Integer("")),
    Field::new("Unknown_Calculation_6", Integer("")),
    Field::new("Unknown_Calculation_7", Integer("")),
    Field::new("Unknown_Calculation_8", Integer("")),
    Field::new("Unknown_Calculation_9", Integer("")),
    Field::new("ID_WEB_Temperatur_TVL", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TRL", Tenths("°C")),
    Field::new("ID_WEB_Sollwert_TRL_HZ", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TRL_ext", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_THG", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TA", Tenths("°C")),
    Field::new("ID_WEB_Mitteltemperatur", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TBW", Tenths("°C")),
    Field::new("ID_WEB_Einst_BWS_akt", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TWE", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TWA", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TFB1", Tenths("°C")),
    Field::new("ID_WEB_Sollwert_TVL_MK1", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_RFV", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TFB2", Tenths("°C")),
    Field::new("ID_WEB_Sollwert_TVL_MK2", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TSK", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TSS", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TEE", Tenths("°C")),
    Field::new("ID_WEB_ASDin", Bool),
    Field::new("ID_WEB_BWTin", Bool),
    Field::new("ID_WEB_EVUin", Bool),
    Field::new("ID_WEB_HDin", Bool),
    Field::new("ID_WEB_MOTin", Bool),
    Field::new("ID_WEB_NDin", Bool),
    Field::new("ID_WEB_PEXin", Bool),
    Field::new("ID_WEB_SWTin", Bool),
    Field::new("ID_WEB_AVout", Bool),
    Field::new("ID_WEB_BUPout", Bool),
    Field::new("ID_WEB_HUPout", Bool),
    Field::new("ID_WEB_MA1out", Bool),
    Field::new("ID_WEB_MZ1out", Bool),
    Field::new("ID_WEB_VENout", Bool),
    Field::new("ID_WEB_VBOout", Bool),
    Field::new("ID_WEB_VD1out", Bool),
    Field::new("ID_WEB_VD2out", Bool),
    Field::new("ID_WEB_ZIPout", Bool),
    Field::new("ID_WEB_ZUPout", Bool),
    Field::new("ID_WEB_ZW1out", Bool),
    Field::new("ID_WEB_ZW2SSTout", Bool),
    Field::new("ID_WEB_ZW3SSTout", Bool),
    Field::new("ID_WEB_FP2out", Bool),
    Field::new("ID_WEB_SLPout", Bool),
    Field::new("ID_WEB_SUPout", Bool),
    Field::new("ID_WEB_MZ2out", Bool),
    Field::new("ID_WEB_MA2out", Bool),
    Field::new("ID_WEB_Zaehler_BetrZeitVD1", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitImpVD1", Integer("")),
    Field::new("ID_WEB_Zaehler_BetrZeitVD2", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitImpVD2", Integer("")),
    Field::new("ID_WEB_Zaehler_BetrZeitZWE1", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitZWE2", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitZWE3", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitWP", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitHz", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitBW", Integer("s")),
    Field::new("ID_WEB_Zaehler_BetrZeitKue", Integer("s")),
    Field::new("ID_WEB_Time_WPein_akt", Integer("s")),
    Field::new("ID_WEB_Time_ZWE1_akt", Integer("s")),
    Field::new("ID_WEB_Time_ZWE2_akt", Integer("s")),
    Field::new("ID_WEB_Timer_EinschVerz", Integer("s")),
    Field::new("ID_WEB_Time_SSPAUS_akt", Integer("s")),
    Field::new("ID_WEB_Time_SSPEIN_akt", Integer("s")),
    Field::new("ID_WEB_Time_VDStd_akt", Integer("s")),
    Field::new("ID_WEB_Time_HRM_akt", Integer("s")),
    Field::new("ID_WEB_Time_HRW_akt", Integer("s")),
    Field::new("ID_WEB_Time_LGS_akt", Integer("s")),
    Field::new("ID_WEB_Time_SBW_akt", Integer("s")),
    Field::new("ID_WEB_Code_WP_akt", Selection(HEAT_PUMP_CODES)),
    Field::new("ID_WEB_BIV_Stufe_akt", Selection(BIVALENCE_LEVELS)),
    Field::new("ID_WEB_WP_BZ_akt", Selection(OPERATION_MODES)),
    Field::new("ID_WEB_SoftStand_0", Character),
    Field::new("ID_WEB_SoftStand_1", Character),
    Field::new("ID_WEB_SoftStand_2", Character),
    Field::new("ID_WEB_SoftStand_3", Character),
    Field::new("ID_WEB_SoftStand_4", Character),
    Field::new("ID_WEB_SoftStand_5", Character),
    Field::new("ID_WEB_SoftStand_6", Character),
    Field::new("ID_WEB_SoftStand_7", Character),
    Field::new("ID_WEB_SoftStand_8", Character),
    Field::new("ID_WEB_SoftStand_9", Character),
    Field::new("ID_WEB_AdresseIP_akt", Ipv4),
    Field::new("ID_WEB_SubNetMask_akt", Ipv4),
    Field::new("ID_WEB_Add_Broadcast", Ipv4),
    Field::new("ID_WEB_Add_StdGateway", Ipv4),
    Field::new("ID_WEB_ERROR_Time0", Timestamp),
    Field::new("ID_WEB_ERROR_Time1", Timestamp),
    Field::new("ID_WEB_ERROR_Time2", Timestamp),
    Field::new("ID_WEB_ERROR_Time3", Timestamp),
    Field::new("ID_WEB_ERROR_Time4", Timestamp),
    Field::new("ID_WEB_ERROR_Nr0", ErrorCode),
    Field::new("ID_WEB_ERROR_Nr1", ErrorCode),
    Field::new("ID_WEB_ERROR_Nr2", ErrorCode),
    Field::new("ID_WEB_ERROR_Nr3", ErrorCode),
    Field::new("ID_WEB_ERROR_Nr4", ErrorCode),
    Field::new("ID_WEB_AnzahlFehlerInSpeicher", Integer("")),
    Field::new("ID_WEB_Switchoff_file_Nr0", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff_file_Nr1", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff_file_Nr2", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff_file_Nr3", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff_file_Nr4", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff_file_Time0", Timestamp),
    Field::new("ID_WEB_Switchoff_file_Time1", Timestamp),
    Field::new("ID_WEB_Switchoff_file_Time2", Timestamp),
    Field::new("ID_WEB_Switchoff_file_Time3", Timestamp),
    Field::new("ID_WEB_Switchoff_file_Time4", Timestamp),
    Field::new("ID_WEB_Comfort_exists", Bool),
    Field::new("ID_WEB_HauptMenuStatus_Zeile1", Selection(STATUS_LINE_1)),
    Field::new("ID_WEB_HauptMenuStatus_Zeile2", Selection(STATUS_LINE_2)),
    Field::new("ID_WEB_HauptMenuStatus_Zeile3", Selection(STATUS_LINE_3)),
    Field::new("ID_WEB_HauptMenuStatus_Zeit", Integer("s")),
    Field::new("ID_WEB_HauptMenuAHP_Stufe", Integer("")),
    Field::new("ID_WEB_HauptMenuAHP_Temp", Tenths("°C")),
    Field::new("ID_WEB_HauptMenuAHP_Zeit", Integer("s")),
    Field::new("ID_WEB_SH_BWW", Bool),
    Field::new("ID_WEB_SH_HZ", Integer("")),
    Field::new("ID_WEB_SH_MK1", Integer("")),
    Field::new("ID_WEB_SH_MK2", Integer("")),
    Field::new("ID_WEB_Einst_Kurzrpgramm", Integer("")),
    Field::new("ID_WEB_StatusSlave_1", Integer("")),
    Field::new("ID_WEB_StatusSlave_2", Integer("")),
    Field::new("ID_WEB_StatusSlave_3", Integer("")),
    Field::new("ID_WEB_StatusSlave_4", Integer("")),
    Field::new("ID_WEB_StatusSlave_5", Integer("")),
    Field::new("ID_WEB_AktuelleTimeStamp", Timestamp),
    Field::new("ID_WEB_SH_MK3", Integer("")),
    Field::new("ID_WEB_Sollwert_TVL_MK3", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TFB3", Tenths("°C")),
    Field::new("ID_WEB_MZ3out", Bool),
    Field::new("ID_WEB_MA3out", Bool),
    Field::new("ID_WEB_FP3out", Bool),
    Field::new("ID_WEB_Time_AbtIn", Integer("s")),
    Field::new("ID_WEB_Temperatur_RFV2", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_RFV3", Tenths("°C")),
    Field::new("ID_WEB_SH_SW", Integer("")),
    Field::new("ID_WEB_Zaehler_BetrZeitSW", Integer("")),
    Field::new("ID_WEB_FreigabKuehl", Bool),
    Field::new("ID_WEB_AnalogIn", Tenths("V")),
    Field::new("ID_WEB_SonderZeichen", Integer("")),
    Field::new("ID_WEB_SH_ZIP", Integer("")),
    Field::new("ID_WEB_WebsrvProgrammWerteBeobarten", Integer("")),
    Field::new("ID_WEB_WMZ_Heizung", Tenths("kWh")),
    Field::new("ID_WEB_WMZ_Brauchwasser", Tenths("kWh")),
    Field::new("ID_WEB_WMZ_Schwimmbad", Tenths("kWh")),
    Field::new("ID_WEB_WMZ_Seit", Tenths("kWh")),
    Field::new("ID_WEB_WMZ_Durchfluss", Integer("l/h")),
    Field::new("ID_WEB_AnalogOut1", Tenths("V")),
    Field::new("ID_WEB_AnalogOut2", Tenths("V")),
    Field::new("ID_WEB_Time_Heissgas", Integer("s")),
    Field::new("ID_WEB_Temp_Lueftung_Zuluft", Tenths("°C")),
    Field::new("ID_WEB_Temp_Lueftung_Abluft", Tenths("°C")),
    Field::new("ID_WEB_Zaehler_BetrZeitSolar", Integer("s")),
    Field::new("ID_WEB_AnalogOut3", Tenths("V")),
    Field::new("ID_WEB_AnalogOut4", Tenths("V")),
    Field::new("ID_WEB_Out_VZU", Tenths("V")),
    Field::new("ID_WEB_Out_VAB", Tenths("V")),
    Field::new("ID_WEB_Out_VSK", Bool),
    Field::new("ID_WEB_Out_FRH", Bool),
    Field::new("ID_WEB_AnalogIn2", Tenths("V")),
    Field::new("ID_WEB_AnalogIn3", Tenths("V")),
    Field::new("ID_WEB_SAXin", Bool),
    Field::new("ID_WEB_SPLin", Bool),
    Field::new("ID_WEB_Compact_exists", Bool),
    Field::new("ID_WEB_Durchfluss_WQ", Integer("l/h")),
    Field::new("ID_WEB_LIN_exists", Bool),
    Field::new("ID_WEB_LIN_ANSAUG_VERDAMPFER", Tenths("°C")),
    Field::new("ID_WEB_LIN_ANSAUG_VERDICHTER", Tenths("°C")),
    Field::new("ID_WEB_LIN_VDH", Tenths("°C")),
    Field::new("ID_WEB_LIN_UH", Tenths("K")),
    Field::new("ID_WEB_LIN_UH_Soll", Tenths("K")),
    Field::new("ID_WEB_LIN_HD", Tenths("bar")),
    Field::new("ID_WEB_LIN_ND", Tenths("bar")),
    Field::new("ID_WEB_LIN_VDH_out", Bool),
    Field::new("ID_WEB_HZIO_PWM", Integer("%")),
    Field::new("ID_WEB_HZIO_VEN", Integer("rpm")),
    Field::new("ID_WEB_HZIO_EVU2", Integer("")),
    Field::new("ID_WEB_HZIO_STB", Bool),
    Field::new("ID_WEB_SEC_Qh_Soll", Tenths("kWh")),
    Field::new("ID_WEB_SEC_Qh_Ist", Tenths("kWh")),
    Field::new("ID_WEB_SEC_TVL_Soll", Tenths("°C")),
    Field::new("ID_WEB_SEC_Software", Integer("")),
    Field::new("ID_WEB_SEC_BZ", Selection(SEC_OPERATION_MODES)),
    Field::new("ID_WEB_SEC_VWV", Integer("")),
    Field::new("ID_WEB_SEC_VD", Integer("rpm")),
    Field::new("ID_WEB_SEC_VerdEVI", Tenths("°C")),
    Field::new("ID_WEB_SEC_AnsEVI", Tenths("°C")),
    Field::new("ID_WEB_SEC_UEH_EVI", Tenths("K")),
    Field::new("ID_WEB_SEC_UEH_EVI_S", Tenths("K")),
    Field::new("ID_WEB_SEC_KondTemp", Tenths("°C")),
    Field::new("ID_WEB_SEC_FlussigEx", Tenths("°C")),
    Field::new("ID_WEB_SEC_UK_EEV", Tenths("°C")),
    Field::new("ID_WEB_SEC_EVI_Druck", Tenths("bar")),
    Field::new("ID_WEB_SEC_U_Inv", Tenths("V")),
    Field::new("ID_WEB_Temperatur_THG_2", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_TWE_2", Tenths("°C")),
    Field::new("ID_WEB_LIN_ANSAUG_VERDAMPFER_2", Tenths("°C")),
    Field::new("ID_WEB_LIN_ANSAUG_VERDICHTER_2", Tenths("°C")),
    Field::new("ID_WEB_LIN_VDH_2", Tenths("°C")),
    Field::new("ID_WEB_LIN_UH_2", Tenths("K")),
    Field::new("ID_WEB_LIN_UH_Soll_2", Tenths("K")),
    Field::new("ID_WEB_LIN_HD_2", Tenths("bar")),
    Field::new("ID_WEB_LIN_ND_2", Tenths("bar")),
    Field::new("ID_WEB_HDin_2", Bool),
    Field::new("ID_WEB_AVout_2", Bool),
    Field::new("ID_WEB_VBOout_2", Bool),
    Field::new("ID_WEB_VD1out_2", Bool),
    Field::new("ID_WEB_LIN_VDH_out_2", Bool),
    Field::new("ID_WEB_Switchoff2_file_Nr0", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff2_file_Nr1", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff2_file_Nr2", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff2_file_Nr3", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff2_file_Nr4", Selection(SWITCH_OFF_REASONS)),
    Field::new("ID_WEB_Switchoff2_file_Time0", Timestamp),
    Field::new("ID_WEB_Switchoff2_file_Time1", Timestamp),
    Field::new("ID_WEB_Switchoff2_file_Time2", Timestamp),
    Field::new("ID_WEB_Switchoff2_file_Time3", Timestamp),
    Field::new("ID_WEB_Switchoff2_file_Time4", Timestamp),
    Field::new("ID_WEB_RBE_RT_Ist", Tenths("°C")),
    Field::new("ID_WEB_RBE_RT_Soll", Tenths("°C")),
    Field::new("ID_WEB_Temperatur_BW_oben", Tenths("°C")),
    Field::new("ID_WEB_Code_WP_akt_2", Selection(HEAT_PUMP_CODES)),
    Field::new("ID_WEB_Freq_VD", Integer("Hz")),
    Field::new("Vapourisation_Temperature", Tenths("°C")),
    Field::new("Liquefaction_Temperature", Tenths("°C")),
    Field::new("Unknown_Calculation_234", Integer("")),
    Field::new("Unknown_Calculation_235", Integer("")),
    Field::new("ID_WEB_Freq_VD_Soll", Integer("Hz")),
    Field::new("ID_WEB_Freq_VD_Min", Integer("Hz")),
    Field::new("ID_WEB_Freq_VD_Max", Integer("Hz")),
    Field::new("VBO_Temp_Spread_Soll", Tenths("K")),
    Field::new("VBO_Temp_Spread_Ist", Tenths("K")),
    Field::new("HUP_PWM", Integer("%")),
    Field::new("HUP_Temp_Spread_Soll", Tenths("K")),
    Field::new("HUP_Temp_Spread_Ist", Tenths("K")),
    Field::new("Unknown_Calculation_244", Integer("")),
    Field::new("Unknown_Calculation_245", Integer("")),
    Field::new("Unknown_Calculation_246", Integer("")),
    Field::new("Unknown_Calculation_247", Integer("")),
    Field::new("Unknown_Calculation_248", Integer("")),
    Field::new("Unknown_Calculation_249", Integer("")),
    Field::new("Unknown_Calculation_250", Integer("")),
    Field::new("Unknown_Calculation_251", Integer("")),
    Field::new("Unknown_Calculation_252", Integer("")),
    Field::new("Unknown_Calculation_253", Integer("")),
    Field::new("Flow_Rate_254", Integer("l/h")),
    Field::new("Unknown_Calculation_255", Integer("")),
    Field::new("Unknown_Calculation_256", Integer("")),
    Field::new("Heat_Output", Integer("W")),
    Field::new("RBE_Version", Version),
    Field::new("Unknown_Calculation_259", Integer("")),
    Field::new("Unknown_Calculation_260", Integer("")),
    Field::new("Unknown_Calculation_261", Integer("")),
    Field::new("Unknown_Calculation_262", Integer("")),
    Field::new("Unknown_Calculation_263", Integer("")),
    Field::new("Unknown_Calculation_264", Integer("")),
    Field::new("Unknown_Calculation_265", Integer("")),
    Field::new("Unknown_Calculation_266", Integer("")),
    Field::new("Desired_Room_Temperature", Tenths("°C")),
];

pub fn index_of(name: &str) -> Option<usize> {
    CALCULATIONS.iter().position(|field| field.name == name)
}
